// tests/axis_formatting_test.rs

use motor_loop_render::plot_framework::format_axis_value;

#[test]
fn test_speed_amplitude_axis_formatting() {
    // Speed deviation values sit around -1..1 and should keep one decimal
    let amplitude_label = "Amplitude (rad/s)";

    assert_eq!(format_axis_value(-1.0, amplitude_label), "-1.0");
    assert_eq!(format_axis_value(-0.4, amplitude_label), "-0.4");
    assert_eq!(format_axis_value(0.0, amplitude_label), "0.0");
    assert_eq!(format_axis_value(0.8, amplitude_label), "0.8");
}

#[test]
fn test_time_axis_formatting() {
    let time_label = "Time (s)";

    assert_eq!(format_axis_value(0.0, time_label), "0"); // 0.0.fract() = 0.0, integer format
    assert_eq!(format_axis_value(1.5, time_label), "1.5");
    assert_eq!(format_axis_value(10.0, time_label), "10");
    assert_eq!(format_axis_value(2500.0, time_label), "2k"); // 2.5 formatted with {:.0} rounds to even
    assert_eq!(format_axis_value(1_500_000.0, time_label), "1.5M");
}

#[test]
fn test_complex_plane_axis_formatting() {
    // Root plots zoom into small regions, two decimals everywhere
    assert_eq!(format_axis_value(0.0, "Re(λ)"), "0.00");
    assert_eq!(format_axis_value(-0.25, "Im(λ)"), "-0.25");
    assert_eq!(format_axis_value(1.0, "Re(λ)"), "1.00");
}

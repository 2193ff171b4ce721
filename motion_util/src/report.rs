//! Console output for the command line tools

use std::io::{self, Write};

use path_planner::f64::{PathPlan, Segment};
use stepper_math::{ProfileSample, TraceRecord, TrapezoidProfile};
use uom::si::{length::meter, time::second};

/// Drop (not round) everything past `places` decimals
pub fn truncate_decimals(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).trunc() / scale
}

pub fn format_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", items.join(", "))
}

pub fn format_record(record: &TraceRecord) -> String {
    format!("{} {} {}", record.tick, record.velocity, record.position)
}

/// ((start, end), (ux, uy, uz))
pub fn format_segment(segment: &Segment) -> String {
    let [ux, uy, uz] = segment.direction;
    format!(
        "(({:?}, {:?}), ({ux:?}, {uy:?}, {uz:?}))",
        segment.start.get::<second>(),
        segment.end.get::<second>(),
    )
}

pub fn write_plan<W: Write>(out: &mut W, plan: &PathPlan) -> io::Result<()> {
    writeln!(out, "{}", format_list(&plan.max_displacement))?;
    let lengths: Vec<f64> = plan
        .lengths()
        .iter()
        .map(|length| truncate_decimals(length.get::<meter>(), 4))
        .collect();
    writeln!(out, "{}", format_list(&lengths))?;
    for segment in &plan.segments {
        writeln!(out, "{}", format_segment(segment))?;
    }
    writeln!(out)?;
    writeln!(out, "{:?}", plan.total_motion_time.get::<second>())
}

pub fn write_trapezoid_header<W: Write>(out: &mut W, profile: &TrapezoidProfile) -> io::Result<()> {
    writeln!(
        out,
        "# dx={}  Ts={}  Td={}  Te={}",
        profile.dx(),
        profile.ramp_ticks(),
        profile.brake_tick(),
        profile.end_tick()
    )?;
    writeln!(
        out,
        "# ticks, seconds, velocity, position (calculated), position (accumulated)"
    )
}

pub fn format_sample(sample: &ProfileSample) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {}",
        sample.tick, sample.seconds, sample.velocity, sample.position, sample.accumulated
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_planner::f64::{ExponentialPlanner, Waypoints};
    use path_planner::Preset;

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(truncate_decimals(0.123456, 4), 0.1234);
        assert_eq!(truncate_decimals(-0.123456, 4), -0.1234);
        assert_eq!(truncate_decimals(2.0, 4), 2.0);
    }

    #[test]
    fn lists_print_like_floats() {
        assert_eq!(format_list(&[0.1, 0.1, 0.0]), "[0.1, 0.1, 0.0]");
        assert_eq!(format_list(&[]), "[]");
    }

    #[test]
    fn record_line() {
        let record = TraceRecord {
            tick: 29,
            velocity: 1,
            position: 0,
        };
        assert_eq!(format_record(&record), "29 1 0");
    }

    #[test]
    fn square_report() {
        let plan = ExponentialPlanner::default()
            .plan(&Waypoints::preset(Preset::Square))
            .unwrap();
        let mut out = Vec::new();
        write_plan(&mut out, &plan).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "[0.1, 0.1, 0.0]");
        assert_eq!(lines[1], "[0.1, 0.1, 0.1, 0.1]");
        assert_eq!(lines[2], "((0.0, 0.1), (0.0, 1.0, 0.0))");
        assert!(lines[3].starts_with("((0.16"));
        assert_eq!(lines[6], "");
        assert!(lines[7].starts_with("0.6463"));
    }

    #[test]
    fn trapezoid_lines() {
        let profile = TrapezoidProfile::plan(100, 1000, 1000, 1000).unwrap();
        let mut out = Vec::new();
        write_trapezoid_header(&mut out, &profile).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# dx=1000  Ts=100  Td=10000  Te=10100\n"));

        let sample = profile.samples(10).nth(1).unwrap();
        assert_eq!(format_sample(&sample), "10 0.010000 10.000000 0.050000 0");
    }
}

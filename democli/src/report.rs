use crate::models::SensorSamplePage;
use plm_core::plm::UserProjectInfo;
use std::io::{self, Write};

/// Print the names of the projects the user belongs to.
pub fn write_projects<W: Write + ?Sized>(projects: &[UserProjectInfo], out: &mut W) -> io::Result<()> {
    writeln!(out, "Available projects:")?;
    for it in projects {
        writeln!(out, "Name: {}", it.in_project.name)?;
    }
    out.flush()
}

/// Print one page of sensor values, one per line.
pub fn write_samples<W: Write + ?Sized>(samples: &SensorSamplePage, out: &mut W) -> io::Result<()> {
    writeln!(out, "Sensor data:")?;
    for val in &samples.values {
        writeln!(out, "{}", display_value(val))?;
    }
    out.flush()
}

// Strings print without their JSON quotes.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Export helpers for CSV traces and JSON run summaries.

pub mod trace {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    const HEADER: &str = "time,x,y,vx,vy,radius,speed,specific_energy,angular_momentum,eccentricity,orbit_type,active_division,total_area";

    /// Frame-by-frame CSV trace of a run.
    ///
    /// The header goes out on creation; rows follow in the order they are
    /// written. `-` as the path streams to stdout.
    pub struct TraceWriter {
        out: Box<dyn Write>,
        rows: usize,
    }

    impl TraceWriter {
        pub fn create(path: &Path) -> io::Result<Self> {
            let out: Box<dyn Write> = if path == Path::new("-") {
                Box::new(BufWriter::new(io::stdout().lock()))
            } else {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Box::new(BufWriter::new(File::create(path)?))
            };
            Self::from_writer(out)
        }

        /// Wrap an arbitrary sink, writing the header immediately.
        pub fn from_writer(mut out: Box<dyn Write>) -> io::Result<Self> {
            writeln!(out, "{HEADER}")?;
            Ok(Self { out, rows: 0 })
        }

        pub fn write(&mut self, record: &Record<'_>) -> io::Result<()> {
            record.write_to(self.out.as_mut())?;
            self.rows += 1;
            Ok(())
        }

        pub fn rows(&self) -> usize {
            self.rows
        }

        /// Flush buffered rows and return how many were written.
        pub fn finish(mut self) -> io::Result<usize> {
            self.out.flush()?;
            Ok(self.rows)
        }
    }

    /// CSV row emitted for one sample of the orbit.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub time: f64,
        pub position: [f64; 2],
        pub velocity: [f64; 2],
        pub radius: f64,
        pub speed: f64,
        pub specific_energy: f64,
        pub angular_momentum: f64,
        pub eccentricity: f64,
        pub orbit_type: &'a str,
        pub active_division: Option<usize>,
        pub total_area: f64,
    }

    impl<'a> Record<'a> {
        /// Serialize the record to CSV, matching the standard header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let division = self
                .active_division
                .map(|d| d.to_string())
                .unwrap_or_default();
            writeln!(
                writer,
                "{:.9},{:.9},{:.9},{:.9},{:.9},{:.9},{:.9},{:.9},{:.9},{:.9},{},{},{:.9}",
                self.time,
                self.position[0],
                self.position[1],
                self.velocity[0],
                self.velocity[1],
                self.radius,
                self.speed,
                self.specific_energy,
                self.angular_momentum,
                self.eccentricity,
                self.orbit_type,
                division,
                self.total_area,
            )
        }
    }
}

pub mod summary {
    use chrono::{DateTime, Utc};
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Per-division result in the run summary.
    #[derive(Debug, Clone, Serialize)]
    pub struct DivisionSummary {
        pub index: usize,
        pub area: f64,
        /// Relative deviation from πab/n, when the orbit is bound.
        pub deviation: Option<f64>,
    }

    /// Envelope describing a completed headless run.
    #[derive(Debug, Clone, Serialize)]
    pub struct RunSummary {
        pub preset: String,
        pub central_body: String,
        pub mu: f64,
        pub orbit_type: String,
        pub simulated_time: f64,
        pub steps: usize,
        pub substeps: usize,
        pub eccentricity: f64,
        pub semi_major_axis: Option<f64>,
        pub semi_minor_axis: Option<f64>,
        pub period: Option<f64>,
        pub measured_period: Option<f64>,
        pub ellipse_area: Option<f64>,
        pub total_area_swept: f64,
        pub energy_drift: f64,
        pub divisions: Vec<DivisionSummary>,
    }

    #[derive(Serialize)]
    struct SummaryDocument<'a> {
        generated_at: DateTime<Utc>,
        #[serde(flatten)]
        summary: &'a RunSummary,
    }

    /// Write the summary as pretty JSON, creating parent directories as needed.
    pub fn write_summary(output: &Path, summary: &RunSummary) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let document = SummaryDocument {
            generated_at: Utc::now(),
            summary,
        };
        to_writer_pretty(File::create(output)?, &document)?;
        Ok(())
    }
}

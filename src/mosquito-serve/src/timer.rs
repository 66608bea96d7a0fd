use chrono::{DateTime, Utc};
use log::info;

/// Logs how long a named stage of the pipeline took.
pub struct Timer {
    name: String,
    started: DateTime<Utc>,
}

impl Timer {
    /// Start timing `name`
    pub fn start(name: &str) -> Self {
        info!("{}: starting", name);

        Timer {
            name: name.to_owned(),
            started: Utc::now(),
        }
    }

    /// Milliseconds since the timer was started
    pub fn elapsed(&self) -> i64 {
        (Utc::now() - self.started).num_milliseconds()
    }

    /// Stop the timer, returning the stage duration in milliseconds
    pub fn stop(self) -> i64 {
        let msec = self.elapsed();
        info!("{} duration: {} msec", self.name, msec);
        msec
    }
}

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

// Returns the file holding the persisted schedule.
// Defaults to "schedule.json" in the working directory.
pub fn get_schedule_location() -> String {
    env::var("SCHEDULE_FILE").unwrap_or("./schedule.json".to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub description: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Schedule {
    pub events: Vec<Event>,
}

impl Schedule {
    pub fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    // Out-of-range indices leave the event list untouched.
    pub fn remove_at(&mut self, index: usize) -> Option<Event> {
        if index < self.events.len() {
            Some(self.events.remove(index))
        } else {
            None
        }
    }
}

// A missing or unreadable schedule file means no events yet.
pub fn load_schedule() -> Schedule {
    match fs::read_to_string(get_schedule_location()) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => Schedule::default(),
    }
}

pub fn save_schedule(schedule: &Schedule) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let serialized = serde_json::to_string_pretty(schedule)?;
    fs::write(get_schedule_location(), serialized)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    static ENV_LOCK: StdMutex<()> = StdMutex::new(());

    fn prepare_schedule_file(test_name: &str) -> (std::sync::MutexGuard<'static, ()>, tempfile::TempDir) {
        let guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        unsafe {
            std::env::set_var("SCHEDULE_FILE", dir.path().join(format!("{}.json", test_name)));
        }
        (guard, dir)
    }

    fn event(description: &str, date: &str) -> Event {
        Event {
            description: description.to_string(),
            date: date.to_string(),
            time: "10:00".to_string(),
        }
    }

    #[test]
    fn load_returns_empty_schedule_when_file_missing() {
        let (_guard, _dir) = prepare_schedule_file("missing");
        let schedule = load_schedule();
        assert!(schedule.events.is_empty());
    }

    #[test]
    fn load_returns_empty_schedule_when_file_corrupt() {
        let (_guard, _dir) = prepare_schedule_file("corrupt");
        fs::write(get_schedule_location(), "not json").unwrap();
        let schedule = load_schedule();
        assert!(schedule.events.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_guard, _dir) = prepare_schedule_file("round_trip");
        let mut schedule = Schedule::default();
        schedule.append(event("dentist", "2024-05-02"));
        schedule.append(event("yoga", "2024-05-06"));
        save_schedule(&schedule).unwrap();

        let reloaded = load_schedule();
        assert_eq!(reloaded.events.len(), 2);
        assert_eq!(reloaded.events[0].description, "dentist");
        assert_eq!(reloaded.events[1].date, "2024-05-06");

        // Serializing what was just deserialized reproduces the same document.
        let before = fs::read_to_string(get_schedule_location()).unwrap();
        save_schedule(&reloaded).unwrap();
        let after = fs::read_to_string(get_schedule_location()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_at_returns_none_out_of_range() {
        let mut schedule = Schedule::default();
        schedule.append(event("dentist", "2024-05-02"));
        assert!(schedule.remove_at(1).is_none());
        assert_eq!(schedule.events.len(), 1);
    }

    #[test]
    fn remove_at_keeps_insertion_order() {
        let mut schedule = Schedule::default();
        schedule.append(event("a", "2024-05-02"));
        schedule.append(event("b", "2024-05-03"));
        schedule.append(event("c", "2024-05-04"));
        let removed = schedule.remove_at(1).unwrap();
        assert_eq!(removed.description, "b");
        assert_eq!(schedule.events[0].description, "a");
        assert_eq!(schedule.events[1].description, "c");
    }
}

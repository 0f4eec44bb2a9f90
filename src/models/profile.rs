use serde_json::{Map, Value};
use std::env;
use std::fs;

// Returns the file holding the persisted user profile.
// Defaults to "user_profile.json" in the working directory.
pub fn get_profile_location() -> String {
    env::var("PROFILE_FILE").unwrap_or("./user_profile.json".to_string())
}

pub type UserProfile = Map<String, Value>;

// A missing or unreadable profile file means an empty profile.
pub fn load_profile() -> UserProfile {
    let content = match fs::read_to_string(get_profile_location()) {
        Ok(content) => content,
        Err(_) => return UserProfile::new(),
    };
    let parsed: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(_) => return UserProfile::new(),
    };
    let Value::Object(profile) = parsed else {
        return UserProfile::new();
    };
    if let Some(Value::String(text)) = profile.get("profile_text") {
        return convert_legacy_profile(text);
    }
    profile
}

// Older profiles stored a single "profile_text" blob of "key: value" lines.
fn convert_legacy_profile(text: &str) -> UserProfile {
    let mut profile = UserProfile::new();
    for line in text.lines() {
        if let Some((key, value)) = line.split_once(':') {
            profile.insert(
                key.trim().to_lowercase(),
                Value::String(value.trim().to_string()),
            );
        }
    }
    profile
}

pub fn save_profile(profile: &UserProfile) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let serialized = serde_json::to_string_pretty(profile)?;
    fs::write(get_profile_location(), serialized)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;

    static ENV_LOCK: StdMutex<()> = StdMutex::new(());

    fn prepare_profile_file(test_name: &str) -> (std::sync::MutexGuard<'static, ()>, tempfile::TempDir) {
        let guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        unsafe {
            std::env::set_var("PROFILE_FILE", dir.path().join(format!("{}.json", test_name)));
        }
        (guard, dir)
    }

    #[test]
    fn load_returns_empty_profile_when_file_missing() {
        let (_guard, _dir) = prepare_profile_file("missing");
        assert!(load_profile().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_guard, _dir) = prepare_profile_file("round_trip");
        let mut profile = UserProfile::new();
        profile.insert("name".to_string(), json!("Sam"));
        profile.insert("morning_start".to_string(), json!("07:00"));
        save_profile(&profile).unwrap();

        let reloaded = load_profile();
        assert_eq!(reloaded.get("name"), Some(&json!("Sam")));
        assert_eq!(reloaded.get("morning_start"), Some(&json!("07:00")));
    }

    #[test]
    fn legacy_profile_text_converts_to_key_values() {
        let (_guard, _dir) = prepare_profile_file("legacy");
        let legacy = json!({"profile_text": "Name: Sam\nJob: engineer\nno delimiter here"});
        fs::write(get_profile_location(), legacy.to_string()).unwrap();

        let profile = load_profile();
        assert_eq!(profile.get("name"), Some(&json!("Sam")));
        assert_eq!(profile.get("job"), Some(&json!("engineer")));
        assert_eq!(profile.len(), 2);
    }
}

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::event::{self, Event, Schedule};
use crate::models::profile::{self, UserProfile};
use crate::models::recurrence;

// Occurrences per day when a recurring request omits the count.
const DEFAULT_RECURRENCE_COUNT: u32 = 4;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RecurringArgs {
    // Only weekly semantics exist; the value is carried, never branched on.
    pub frequency: Option<String>,
    pub days: Option<Vec<String>>,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AddEventArgs {
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub recurring: Option<RecurringArgs>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListEventsArgs {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RemoveEventArgs {
    pub index: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileArgs {
    pub updates: Option<Map<String, Value>>,
}

#[derive(Debug, Clone)]
pub enum ToolCall {
    AddEvent(AddEventArgs),
    ListEvents(ListEventsArgs),
    RemoveEvent(RemoveEventArgs),
    GetCurrentDate,
    UpdateUserProfile(UpdateProfileArgs),
    GetUserProfile,
    Unknown(String),
}

impl ToolCall {
    // Malformed argument bundles degrade to defaults, so they surface through
    // the same missing-field messages as absent arguments.
    pub fn parse(name: &str, args: &Value) -> ToolCall {
        match name {
            "add_event" => ToolCall::AddEvent(parse_args(args)),
            "list_events" => ToolCall::ListEvents(parse_args(args)),
            "remove_event" => ToolCall::RemoveEvent(parse_args(args)),
            "get_current_date" => ToolCall::GetCurrentDate,
            "update_user_profile" => ToolCall::UpdateUserProfile(parse_args(args)),
            "get_user_profile" => ToolCall::GetUserProfile,
            other => ToolCall::Unknown(other.to_string()),
        }
    }
}

fn parse_args<T: Default + for<'de> Deserialize<'de>>(args: &Value) -> T {
    serde_json::from_value(args.clone()).unwrap_or_default()
}

pub struct ToolDispatcher;

impl ToolDispatcher {
    // Every outcome the model should explain to the user comes back as an
    // Ok result string; only persistence failures propagate as errors.
    pub fn dispatch(
        schedule: &mut Schedule,
        user_profile: &mut UserProfile,
        call: ToolCall,
        today: NaiveDate,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        match call {
            ToolCall::AddEvent(args) => Self::add_event(schedule, args, today),
            ToolCall::ListEvents(args) => Ok(Self::list_events(schedule, &args)),
            ToolCall::RemoveEvent(args) => Self::remove_event(schedule, &args),
            ToolCall::GetCurrentDate => Ok(today.format("%Y-%m-%d").to_string()),
            ToolCall::UpdateUserProfile(args) => Self::update_user_profile(user_profile, args),
            ToolCall::GetUserProfile => Ok(Self::get_user_profile(user_profile)),
            ToolCall::Unknown(name) => Ok(format!("Unknown operation: {}.", name)),
        }
    }

    fn add_event(
        schedule: &mut Schedule,
        args: AddEventArgs,
        today: NaiveDate,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let description = args.description.unwrap_or_default();
        let time = args.time.unwrap_or_default();
        if description.is_empty() {
            return Ok("Description is required.".to_string());
        }
        if time.is_empty() {
            return Ok("Time is required for all events.".to_string());
        }

        if let Some(recurring) = args.recurring {
            let days = recurring.days.unwrap_or_default();
            let count = recurring.count.unwrap_or(DEFAULT_RECURRENCE_COUNT);
            let events = match recurrence::expand_weekly(&description, &time, &days, count, today) {
                Ok(events) => events,
                Err(message) => return Ok(message),
            };

            // Label each occurrence with the day name the user asked for;
            // the expander emits count events per recognized day, in order.
            let mut added = Vec::new();
            let mut remaining = events.as_slice();
            for day in &days {
                if recurrence::weekday_number(day).is_none() {
                    continue;
                }
                let (group, rest) = remaining.split_at(count as usize);
                for event in group {
                    added.push(format!("{} {}", day, event.date));
                }
                remaining = rest;
            }

            for event in events {
                schedule.append(event);
            }
            event::save_schedule(schedule)?;
            Ok(format!(
                "Added recurring events: {} on {}",
                description,
                added.join(", ")
            ))
        } else {
            let date = args.date.unwrap_or_default();
            if date.is_empty() {
                return Ok("Date is required for single events.".to_string());
            }
            schedule.append(Event {
                description: description.clone(),
                date: date.clone(),
                time: time.clone(),
            });
            event::save_schedule(schedule)?;
            Ok(format!("Added event: {} on {} at {}", description, date, time))
        }
    }

    // Displayed indices count the filtered result, not the underlying store:
    // with a date filter active they can disagree with the indices
    // remove_event expects. Kept as observed behavior.
    fn list_events(schedule: &Schedule, args: &ListEventsArgs) -> String {
        let date_filter = args.date.as_deref().filter(|date| !date.is_empty());
        let filtered: Vec<&Event> = match date_filter {
            Some(date) => schedule
                .events
                .iter()
                .filter(|event| event.date == date)
                .collect(),
            None => schedule.events.iter().collect(),
        };

        if filtered.is_empty() {
            return match date_filter {
                Some(date) => format!("No events scheduled on {}.", date),
                None => "No events scheduled.".to_string(),
            };
        }

        filtered
            .iter()
            .enumerate()
            .map(|(i, event)| {
                format!("{}. {} on {} at {}", i, event.description, event.date, event.time)
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    // The index is interpreted over the full, unfiltered store sequence.
    fn remove_event(
        schedule: &mut Schedule,
        args: &RemoveEventArgs,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let removed = args
            .index
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| schedule.remove_at(index));
        match removed {
            Some(event) => {
                event::save_schedule(schedule)?;
                Ok(format!("Removed event: {}", event.description))
            }
            None => Ok("Invalid index.".to_string()),
        }
    }

    fn update_user_profile(
        user_profile: &mut UserProfile,
        args: UpdateProfileArgs,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let updates = args.updates.unwrap_or_default();
        if updates.is_empty() {
            return Ok("Updates are required to update the profile.".to_string());
        }
        user_profile.extend(updates);
        profile::save_profile(user_profile)?;
        Ok("Profile updated".to_string())
    }

    fn get_user_profile(user_profile: &UserProfile) -> String {
        if user_profile.is_empty() {
            "No profile information available.".to_string()
        } else {
            Value::Object(user_profile.clone()).to_string()
        }
    }
}

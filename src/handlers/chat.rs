use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::clients::gemini_client::{Content, Part};
use crate::handlers::tools::{ToolCall, ToolDispatcher};
use crate::models::event::Schedule;
use crate::models::profile::UserProfile;
use crate::service::gemini_service::GeminiClient;

pub struct ChatEngine {
    client: Arc<dyn GeminiClient>,
    schedule: Schedule,
    user_profile: UserProfile,
    contents: Vec<Content>,
}

impl ChatEngine {
    pub fn new(
        client: Arc<dyn GeminiClient>,
        schedule: Schedule,
        user_profile: UserProfile,
        today: NaiveDate,
    ) -> Self {
        let prompt = instruction_prompt(&schedule, &user_profile, today);
        Self {
            client,
            schedule,
            user_profile,
            contents: vec![Content::user_text(&prompt)],
        }
    }

    // Resolves one full user turn: sends the history, collects text parts,
    // executes tool calls, and issues one follow-up request per executed
    // call. The returned strings are what the caller should print.
    pub async fn handle_turn(
        &mut self,
        user_input: &str,
        today: NaiveDate,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.contents.push(Content::user_text(user_input));

        let parts = self.client.generate(self.contents.clone()).await?;
        if parts.is_empty() {
            return Ok(vec!["No response received.".to_string()]);
        }

        let mut replies = Vec::new();
        for part in parts {
            if let Some(text) = part.text {
                replies.push(text.clone());
                self.contents.push(Content::model_text(&text));
            }
            if let Some(call) = part.function_call {
                let parsed = ToolCall::parse(&call.name, &call.args);
                let result = ToolDispatcher::dispatch(
                    &mut self.schedule,
                    &mut self.user_profile,
                    parsed,
                    today,
                )?;

                // The result turn lands in history before the follow-up
                // request, so the follow-up always sees it. One tool round
                // per user turn: the follow-up contributes text only, and a
                // chained tool call inside it is not executed.
                self.contents.push(Content::function_result(&call.name, &result));
                let follow_up = self.client.generate(self.contents.clone()).await?;
                self.append_text_parts(follow_up, &mut replies);
            }
        }
        Ok(replies)
    }

    fn append_text_parts(&mut self, parts: Vec<Part>, replies: &mut Vec<String>) {
        for part in parts {
            if let Some(text) = part.text {
                replies.push(text.clone());
                self.contents.push(Content::model_text(&text));
            }
        }
    }
}

fn instruction_prompt(schedule: &Schedule, user_profile: &UserProfile, today: NaiveDate) -> String {
    format!(
        "You are a personal scheduling assistant. Manage the user's schedule using the available tools. \n\
Current date: {today}. \n\
Current schedule: {schedule}\n\
User profile: {profile}\n\
\n\
IMPORTANT: Never mention tool calls, function calls, or show tool outputs in your responses. Just respond naturally based on the results.\n\
\n\
When the user asks you to decide or choose a time, analyze their current schedule and suggest available time slots that don't conflict with existing events. \n\
Be proactive in suggesting times based on:\n\
- Avoiding conflicts with existing events\n\
- User preferences from their profile (morning_start, evening_end, preferred times)\n\
- Common preferences (e.g., morning for exercise, afternoon for meetings)\n\
- Gaps in their schedule\n\
Always provide 2-3 time options when suggesting.\n\
\n\
When the user mentions a problem, goal, or improvement area (like \"I lack GK\", \"I need to exercise\", \"I want to learn coding\"), \n\
be helpful and proactive. Suggest adding relevant events or tasks to their schedule to help them achieve their goal.\n\
For example:\n\
- \"I lack GK\" -> Suggest adding daily/weekly GK reading or quiz sessions\n\
- \"I need to exercise\" -> Suggest adding workout sessions\n\
- \"I want to learn X\" -> Suggest adding study/practice sessions\n\
\n\
When the user shares personal information (name, job, preferences, goals, interests, habits, personality traits, etc.), \n\
silently update their profile using update_user_profile without mentioning it in your response.\n\
Use the user profile to personalize your responses and suggestions based on what you know about them.\n\
\n\
Always relate their goals back to their schedule and offer to help them make time for improvement.",
        today = today.format("%Y-%m-%d"),
        schedule = serde_json::to_string(schedule).unwrap_or_default(),
        profile = Value::Object(user_profile.clone()),
    )
}

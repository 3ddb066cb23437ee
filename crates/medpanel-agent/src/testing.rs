// ABOUTME: Test utilities for medpanel-agent, including stub and scripted completion clients.
// ABOUTME: Used in tests to simulate provider responses, failures, delays, and panics without network calls.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use medpanel_core::Role;

use crate::completion::{CompletionClient, CompletionError, CompletionOptions};

/// A stub client that returns the same result for every prompt.
#[derive(Debug)]
pub struct StubCompletionClient {
    reply: Result<String, CompletionError>,
    calls: AtomicUsize,
}

impl StubCompletionClient {
    /// Create a stub client that always returns the given text.
    pub fn new(response_text: &str) -> Self {
        Self {
            reply: Ok(response_text.to_owned()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a stub client that always fails with the given error.
    pub fn failing(error: CompletionError) -> Self {
        Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StubCompletionClient {
    async fn complete(
        &self,
        _prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

/// What a [`ScriptedCompletionClient`] does for a matching prompt.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Error(CompletionError),
    /// Return the prompt itself.
    Echo,
    /// Panic inside the completion call.
    Panic(String),
    /// Wait, then behave like the inner reply.
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Reply::Text(text.to_owned())
    }

    pub fn error(error: CompletionError) -> Self {
        Reply::Error(error)
    }

    pub fn after(self, delay: Duration) -> Self {
        Reply::Delayed(delay, Box::new(self))
    }
}

/// Opening text of each standard template, used to tell prompts apart.
pub fn prompt_marker(role: &Role) -> Option<&'static str> {
    match role {
        Role::Cardiologist => Some("Act like a cardiologist"),
        Role::Psychologist => Some("Act like a psychologist"),
        Role::Pulmonologist => Some("Act like a pulmonologist"),
        Role::MultidisciplinaryTeam => Some("You are a multidisciplinary healthcare team"),
        Role::Custom(_) => None,
    }
}

/// A client that picks its reply by matching the prompt against substring
/// rules (first match wins), records every prompt, and tracks how many
/// calls were in flight at once.
#[derive(Debug)]
pub struct ScriptedCompletionClient {
    rules: Vec<(String, Reply)>,
    fallback: Reply,
    prompts: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for ScriptedCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedCompletionClient {
    /// A client whose unmatched prompts fail with an invalid-response error.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Reply::Error(CompletionError::InvalidResponse(
                "no scripted reply".to_string(),
            )),
            prompts: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Reply with `reply` to prompts containing `needle`.
    pub fn when(mut self, needle: &str, reply: Reply) -> Self {
        self.rules.push((needle.to_owned(), reply));
        self
    }

    /// Reply with `reply` to the standard template of `role`.
    ///
    /// Panics for custom roles, which have no standard template; use
    /// [`ScriptedCompletionClient::when`] for those.
    pub fn when_role(self, role: &Role, reply: Reply) -> Self {
        let marker = prompt_marker(role)
            .unwrap_or_else(|| panic!("role {} has no standard prompt marker", role));
        self.when(marker, reply)
    }

    pub fn fallback(mut self, reply: Reply) -> Self {
        self.fallback = reply;
        self
    }

    /// Every prompt received so far, in arrival order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Prompts that contain `needle`.
    pub fn prompts_containing(&self, needle: &str) -> Vec<String> {
        self.prompts()
            .into_iter()
            .filter(|p| p.contains(needle))
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }

    /// Highest number of simultaneous `complete` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn reply_for(&self, prompt: &str) -> &Reply {
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply)
            .unwrap_or(&self.fallback)
    }
}

/// Decrements the in-flight counter when a call ends, including by panic.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_owned());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let mut reply = self.reply_for(prompt);
        loop {
            match reply {
                Reply::Delayed(delay, inner) => {
                    tokio::time::sleep(*delay).await;
                    reply = inner.as_ref();
                }
                Reply::Text(text) => return Ok(text.clone()),
                Reply::Error(error) => return Err(error.clone()),
                Reply::Echo => return Ok(prompt.to_owned()),
                Reply::Panic(message) => panic!("{}", message),
            }
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

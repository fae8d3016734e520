use tracing::info;

use crate::api::{ApiError, BackendClient};
use crate::flow::{Lifecycle, Phase, Settled, SubmitError, Submission, Ticket};
use crate::models::{ChatRequest, ChatResult};

/// Ayurveda chat screen state: the draft message and the last answer.
#[derive(Debug, Clone)]
pub struct ChatFlow {
    message: String,
    life: Lifecycle<ChatResult>,
}

impl ChatFlow {
    pub fn new(mount: u64) -> Self {
        Self {
            message: String::new(),
            life: Lifecycle::new(mount),
        }
    }

    /// Chat has no precondition, so it is never `Ready`; it idles until the first submit.
    pub fn phase(&self) -> Phase {
        self.life.phase(false)
    }

    pub fn mount(&self) -> u64 {
        self.life.mount()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_mut(&mut self) -> &mut String {
        &mut self.message
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub fn result(&self) -> Option<&ChatResult> {
        self.life.result()
    }

    pub fn error(&self) -> Option<&str> {
        self.life.error()
    }

    pub fn can_submit(&self) -> bool {
        !self.life.is_submitting()
    }

    /// `Ok(None)` when the message is blank: nothing is sent and nothing is reported.
    pub fn submit(&mut self) -> Result<Option<Submission<ChatRequest>>, SubmitError> {
        if self.life.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        let Some(request) = ChatRequest::new(&self.message) else {
            return Ok(None);
        };
        let ticket = self.life.begin()?;
        info!(chars = request.message.chars().count(), "chat submitted");
        Ok(Some(Submission { ticket, request }))
    }

    pub fn settle(&mut self, ticket: Ticket, outcome: Result<ChatResult, ApiError>) -> Settled {
        self.life.settle(ticket, outcome)
    }

    pub async fn run(&mut self, client: &BackendClient) -> Result<Option<Settled>, SubmitError> {
        let Some(Submission { ticket, request }) = self.submit()? else {
            return Ok(None);
        };
        let outcome = client.ayurveda_chat(&request).await;
        Ok(Some(self.settle(ticket, outcome)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_is_a_silent_no_op() {
        let mut flow = ChatFlow::new(0);
        flow.set_message("  \n ");
        assert_eq!(flow.submit(), Ok(None));
        assert_eq!(flow.phase(), Phase::Idle);
        assert!(flow.error().is_none());
    }

    #[test]
    fn submit_blocks_duplicates_until_settled() {
        let mut flow = ChatFlow::new(0);
        flow.set_message("sardi ho gayi");
        let submission = flow.submit().unwrap().unwrap();
        assert_eq!(submission.request.message, "sardi ho gayi");
        assert_eq!(flow.phase(), Phase::Submitting);
        assert_eq!(flow.submit(), Err(SubmitError::InFlight));

        let answer = ChatResult {
            answer: "Rest".into(),
            disclaimer: "Not medical advice.".into(),
            lang: None,
        };
        assert_eq!(flow.settle(submission.ticket, Ok(answer.clone())), Settled::Applied);
        assert_eq!(flow.phase(), Phase::Resolved);
        assert_eq!(flow.result(), Some(&answer));
        assert!(flow.can_submit());
    }
}

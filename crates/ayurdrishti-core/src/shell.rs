//! Navigation shell: which flow is on screen, and the flows themselves.
//!
//! Only the active flow is mounted. Switching away tears the old flow down
//! and mounts a fresh instance under a new generation, so any request the
//! old instance still had in flight settles as [`Settled::Discarded`].

use tracing::info;

use crate::api::ApiError;
use crate::chat::ChatFlow;
use crate::config::ApiBase;
use crate::flow::{Settled, Ticket};
use crate::identify::IdentifyFlow;
use crate::models::{ChatResult, IdentifyResult};
use crate::organ::Organ;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowKind {
    #[default]
    Identify,
    Ayurveda,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Identify => "identify",
            FlowKind::Ayurveda => "ayurveda",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FlowKind::Identify => "Plant Identify",
            FlowKind::Ayurveda => "Ayurveda Chat",
        }
    }

    pub fn all() -> [FlowKind; 2] {
        [FlowKind::Identify, FlowKind::Ayurveda]
    }

    pub fn other(&self) -> FlowKind {
        match self {
            FlowKind::Identify => FlowKind::Ayurveda,
            FlowKind::Ayurveda => FlowKind::Identify,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shell {
    active: FlowKind,
    generation: u64,
    api_base: ApiBase,
    default_organ: Organ,
    pub identify: IdentifyFlow,
    pub chat: ChatFlow,
}

impl Shell {
    pub fn new(api_base: ApiBase, default_organ: Organ) -> Self {
        Self {
            active: FlowKind::default(),
            generation: 1,
            api_base,
            default_organ,
            identify: IdentifyFlow::new(1, default_organ),
            chat: ChatFlow::new(1),
        }
    }

    pub fn active(&self) -> FlowKind {
        self.active
    }

    /// Backend origin, for display only.
    pub fn api_base(&self) -> &ApiBase {
        &self.api_base
    }

    pub fn set_default_organ(&mut self, organ: Organ) {
        self.default_organ = organ;
    }

    /// Switch flows. Returns `false` when `kind` is already active.
    pub fn switch_to(&mut self, kind: FlowKind) -> bool {
        if kind == self.active {
            return false;
        }

        self.generation += 1;
        match self.active {
            FlowKind::Identify => {
                self.identify = IdentifyFlow::new(self.generation, self.default_organ);
            }
            FlowKind::Ayurveda => {
                self.chat = ChatFlow::new(self.generation);
            }
        }
        info!(from = self.active.as_str(), to = kind.as_str(), "switched flow");
        self.active = kind;
        true
    }

    pub fn toggle(&mut self) {
        self.switch_to(self.active.other());
    }

    pub fn settle_identify(
        &mut self,
        ticket: Ticket,
        outcome: Result<IdentifyResult, ApiError>,
    ) -> Settled {
        if self.active != FlowKind::Identify {
            return Settled::Discarded;
        }
        self.identify.settle(ticket, outcome)
    }

    pub fn settle_chat(
        &mut self,
        ticket: Ticket,
        outcome: Result<ChatResult, ApiError>,
    ) -> Settled {
        if self.active != FlowKind::Ayurveda {
            return Settled::Discarded;
        }
        self.chat.settle(ticket, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Phase;
    use crate::models::ImageUpload;

    fn shell() -> Shell {
        Shell::new(ApiBase::default(), Organ::Leaf)
    }

    #[test]
    fn starts_on_identify() {
        let shell = shell();
        assert_eq!(shell.active(), FlowKind::Identify);
        assert_eq!(shell.api_base().as_str(), "http://localhost:8000");
    }

    #[test]
    fn switching_resets_the_flow_left_behind() {
        let mut shell = shell();
        shell.identify.select_image(ImageUpload::from_bytes("neem.png", vec![1]).unwrap());
        shell.identify.set_organ(Organ::Bark);

        assert!(shell.switch_to(FlowKind::Ayurveda));
        assert!(!shell.switch_to(FlowKind::Ayurveda));
        shell.toggle();

        assert_eq!(shell.active(), FlowKind::Identify);
        assert!(shell.identify.image().is_none());
        assert_eq!(shell.identify.organ(), Organ::Leaf);
        assert_eq!(shell.identify.phase(), Phase::Idle);
    }

    #[test]
    fn results_for_torn_down_flows_are_discarded() {
        let mut shell = shell();
        shell.switch_to(FlowKind::Ayurveda);
        shell.chat.set_message("cough");
        let submission = shell.chat.submit().unwrap().unwrap();

        // Away and back: the chat flow is a fresh mount now.
        shell.switch_to(FlowKind::Identify);
        let answer = ChatResult {
            answer: "Steam".into(),
            disclaimer: String::new(),
            lang: None,
        };
        assert_eq!(shell.settle_chat(submission.ticket, Ok(answer.clone())), Settled::Discarded);

        shell.switch_to(FlowKind::Ayurveda);
        assert_eq!(shell.settle_chat(submission.ticket, Ok(answer)), Settled::Discarded);
        assert!(shell.chat.result().is_none());
        assert_eq!(shell.chat.phase(), Phase::Idle);
    }
}

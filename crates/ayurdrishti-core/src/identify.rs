use tracing::{debug, info};

use crate::api::{ApiError, BackendClient};
use crate::flow::{Lifecycle, Phase, Settled, SubmitError, Submission, Ticket};
use crate::models::{IdentifyRequest, IdentifyResult, ImageUpload};
use crate::organ::Organ;

/// Plant identification screen state: chosen image, organ hint, last result.
#[derive(Debug, Clone)]
pub struct IdentifyFlow {
    image: Option<ImageUpload>,
    organ: Organ,
    life: Lifecycle<IdentifyResult>,
}

impl IdentifyFlow {
    pub fn new(mount: u64, organ: Organ) -> Self {
        Self {
            image: None,
            organ,
            life: Lifecycle::new(mount),
        }
    }

    pub fn phase(&self) -> Phase {
        self.life.phase(self.image.is_some())
    }

    pub fn mount(&self) -> u64 {
        self.life.mount()
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn organ(&self) -> Organ {
        self.organ
    }

    pub fn result(&self) -> Option<&IdentifyResult> {
        self.life.result()
    }

    pub fn error(&self) -> Option<&str> {
        self.life.error()
    }

    pub fn can_submit(&self) -> bool {
        !self.life.is_submitting()
    }

    pub fn select_image(&mut self, image: ImageUpload) {
        debug!(file = %image.file_name, mime = image.mime, "image selected");
        self.image = Some(image);
        self.life.rearm();
    }

    pub fn set_organ(&mut self, organ: Organ) {
        self.organ = organ;
    }

    pub fn submit(&mut self) -> Result<Submission<IdentifyRequest>, SubmitError> {
        if self.life.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        let image = self.image.clone().ok_or(SubmitError::MissingImage)?;
        let ticket = self.life.begin()?;
        info!(file = %image.file_name, organ = %self.organ, "identify submitted");
        Ok(Submission {
            ticket,
            request: IdentifyRequest {
                image,
                organ: self.organ,
            },
        })
    }

    pub fn settle(&mut self, ticket: Ticket, outcome: Result<IdentifyResult, ApiError>) -> Settled {
        self.life.settle(ticket, outcome)
    }

    /// Submit and await the backend in one step.
    pub async fn run(&mut self, client: &BackendClient) -> Result<Settled, SubmitError> {
        let Submission { ticket, request } = self.submit()?;
        let outcome = client.identify(&request).await;
        Ok(self.settle(ticket, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageUpload {
        ImageUpload::from_bytes("aloe.jpg", vec![0xff, 0xd8, 0xff]).unwrap()
    }

    #[test]
    fn starts_idle_with_default_organ() {
        let flow = IdentifyFlow::new(0, Organ::default());
        assert_eq!(flow.phase(), Phase::Idle);
        assert_eq!(flow.organ(), Organ::Leaf);
        assert!(flow.result().is_none());
    }

    #[test]
    fn submit_without_image_is_a_validation_error() {
        let mut flow = IdentifyFlow::new(0, Organ::Leaf);
        assert_eq!(flow.submit(), Err(SubmitError::MissingImage));
        assert_eq!(flow.submit().unwrap_err().to_string(), "Select an image");
        assert_eq!(flow.phase(), Phase::Idle);
    }

    #[test]
    fn request_carries_image_and_organ() {
        let mut flow = IdentifyFlow::new(0, Organ::Leaf);
        flow.select_image(image());
        flow.set_organ(Organ::Flower);
        assert_eq!(flow.phase(), Phase::Ready);

        let submission = flow.submit().unwrap();
        assert_eq!(submission.request.organ, Organ::Flower);
        assert_eq!(submission.request.image.file_name, "aloe.jpg");
        assert_eq!(flow.phase(), Phase::Submitting);
        assert!(!flow.can_submit());
        assert_eq!(flow.submit(), Err(SubmitError::InFlight));
    }

    #[test]
    fn new_image_after_result_goes_back_to_ready() {
        let mut flow = IdentifyFlow::new(0, Organ::Leaf);
        flow.select_image(image());
        let submission = flow.submit().unwrap();
        flow.settle(submission.ticket, Ok(IdentifyResult::default()));
        assert_eq!(flow.phase(), Phase::Resolved);

        flow.select_image(image());
        assert_eq!(flow.phase(), Phase::Ready);
        assert!(flow.result().is_some());
    }
}

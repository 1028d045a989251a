//! Per-item notify step: load the video and owner, skip anything that
//! isn't eligible, send, and stamp `notified_at` exactly once.

use tracing::info;

use vclip_db::{UserRepository, VideoRepository};
use vclip_models::ids::VideoId;
use vclip_models::video::VideoStatus;

use crate::error::NotifierResult;
use crate::mailer::{render, Mailer};
use crate::NotifierConfig;

pub struct NotifyPipeline {
    pub videos: VideoRepository,
    pub users: UserRepository,
    pub mailer: Mailer,
    pub config: NotifierConfig,
}

impl NotifyPipeline {
    /// Returns `Ok(())` whether or not an email was actually sent — the
    /// eligibility checks below are legitimate no-ops, not failures. The
    /// orchestrator only sees an `Err` for genuine transient/terminal
    /// trouble reaching the store or the SMTP transport.
    pub async fn process(&self, video_id: VideoId) -> NotifierResult<()> {
        let video = self.videos.get(video_id).await?;

        if video.status != VideoStatus::Ready || video.notified_at.is_some() {
            info!(video_id = %video_id, status = %video.status, "notify_skip: not eligible");
            return Ok(());
        }

        let owner = self.users.get(video.user_id).await?;
        let email = render(&self.config, &video);

        self.mailer.send(&owner.email, email).await?;
        self.videos.mark_notified(video_id).await?;

        info!(video_id = %video_id, "ready_email sent");
        Ok(())
    }
}

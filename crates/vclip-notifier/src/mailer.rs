//! Single-delivery ready-video email: subject/body rendering plus the
//! SMTP transport, kept separate so the rendering can be unit tested
//! without a live transport.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use vclip_models::video::Video;

use crate::config::NotifierConfig;
use crate::error::{NotifierError, NotifierResult};

pub fn video_link(public_base: &str, video: &Video) -> String {
    format!("{}/videos/{}", public_base.trim_end_matches('/'), video.id)
}

pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

pub fn render(config: &NotifierConfig, video: &Video) -> RenderedEmail {
    let name = video.display_title();
    let link = video_link(&config.public_base_url, video);
    RenderedEmail {
        subject: format!("{name} is ready to watch"),
        body: format!("{name} has finished processing and is ready to watch.\n\n{link}\n"),
    }
}

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn new(config: &NotifierConfig) -> NotifierResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port);
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }
        Ok(Self {
            transport: builder.build(),
            from: config.from_address.clone(),
        })
    }

    pub async fn send(&self, to: &str, email: RenderedEmail) -> NotifierResult<()> {
        let message = Message::builder()
            .from(self.from.parse().map_err(|e| {
                NotifierError::Terminal(format!("invalid from address {}: {e}", self.from))
            })?)
            .to(to
                .parse()
                .map_err(|e| NotifierError::Terminal(format!("invalid recipient {to}: {e}")))?)
            .header(ContentType::TEXT_PLAIN)
            .subject(email.subject)
            .body(email.body)
            .map_err(|e| NotifierError::Terminal(format!("failed to build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifierError::Transient(format!("smtp send failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_models::ids::UserId;

    fn video_with(title: &str, filename: &str) -> Video {
        Video::new_uploaded(UserId::new(), title, filename, "raw/k")
    }

    #[test]
    fn display_name_prefers_title() {
        let v = video_with("My Trip", "clip.mp4");
        assert_eq!(v.display_title(), "My Trip");
    }

    #[test]
    fn display_name_falls_back_to_filename_then_generic() {
        let mut v = video_with("", "clip.mp4");
        assert_eq!(v.display_title(), "clip.mp4");
        v.original_filename = "  ".to_string();
        assert_eq!(v.display_title(), "your video");
    }

    #[test]
    fn link_uses_public_base_and_video_id() {
        let v = video_with("t", "f.mp4");
        let link = video_link("http://host:8080/", &v);
        assert_eq!(link, format!("http://host:8080/videos/{}", v.id));
    }

    #[test]
    fn render_includes_name_and_link_in_subject_and_body() {
        let config = NotifierConfig::default();
        let v = video_with("My Trip", "clip.mp4");
        let email = render(&config, &v);
        assert_eq!(email.subject, "My Trip is ready to watch");
        assert!(email.body.contains("My Trip"));
        assert!(email.body.contains(&v.id.to_string()));
    }
}

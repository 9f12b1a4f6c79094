//! Outbound email — delivers generated résumé PDFs over SMTP.
//!
//! All delivery failures reduce to `false` at this boundary; nothing here
//! propagates an error into the surrounding request. The sync SMTP transport
//! is driven on the blocking pool.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info, warn};

use crate::config::Config;

const SERVICE_NAME: &str = "Resume Builder";

/// SMTP client built once at startup and reused for the process lifetime.
#[derive(Clone)]
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
    generated_dir: PathBuf,
}

impl Mailer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials = Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());
        let transport = SmtpTransport::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let from = format!("{SERVICE_NAME} <{}>", config.smtp_user)
            .parse::<Mailbox>()
            .context("invalid SMTP sender address")?;

        Ok(Self {
            transport,
            from,
            generated_dir: config.generated_dir.clone(),
        })
    }

    /// Checks transport reachability and credentials. Logs only; never blocks
    /// startup or requests.
    pub async fn verify(&self) {
        let transport = self.transport.clone();
        match tokio::task::spawn_blocking(move || transport.test_connection()).await {
            Ok(Ok(true)) => info!("Email service is ready to send messages"),
            Ok(Ok(false)) => {
                warn!("Email service connection test failed, emails may not be sent")
            }
            Ok(Err(e)) => {
                warn!("Email service is not properly configured, emails may not be sent: {e}")
            }
            Err(e) => warn!("Email verification task failed: {e}"),
        }
    }

    /// Emails the generated PDF to `email`, attached under a human-readable
    /// name. Returns `false` if the file is missing from disk or the
    /// transport rejects the message.
    pub async fn send_resume_pdf(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        pdf_filename: &str,
    ) -> bool {
        let path = self.generated_dir.join(pdf_filename);
        if !path.exists() {
            error!("PDF file not found at {}", path.display());
            return false;
        }

        let message = match self.build_message(email, first_name, last_name, &path) {
            Ok(message) => message,
            Err(e) => {
                error!("Could not build resume email for {email}: {e}");
                return false;
            }
        };

        let transport = self.transport.clone();
        match tokio::task::spawn_blocking(move || transport.send(&message)).await {
            Ok(Ok(response)) => {
                info!("Email sent successfully: {}", response.code());
                true
            }
            Ok(Err(e)) => {
                error!("Could not send email to {email}: {e}");
                false
            }
            Err(e) => {
                error!("Email task failed to execute: {e}");
                false
            }
        }
    }

    fn build_message(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        path: &Path,
    ) -> anyhow::Result<Message> {
        let to = format!("{first_name} {last_name} <{email}>")
            .parse::<Mailbox>()
            .or_else(|_| email.parse::<Mailbox>())
            .context("invalid recipient address")?;

        let pdf = std::fs::read(path)?;
        let attachment = Attachment::new(attachment_name(first_name, last_name))
            .body(pdf, ContentType::parse("application/pdf")?);

        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Hello {first_name} {last_name},</h2>
  <p>Thank you for using {SERVICE_NAME}! Your resume has been successfully generated.</p>
  <p>Please find your resume attached to this email.</p>
  <p>If you need to make any changes to your resume, you can do so by logging back into our platform.</p>
  <p>Best regards,<br>The {SERVICE_NAME} Team</p>
</div>"#
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("Your Resume is Ready, {first_name}!"))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(html))
                    .singlepart(attachment),
            )?;

        Ok(message)
    }
}

/// Attachment and download name for a generated résumé PDF.
pub fn attachment_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name}_{last_name}_Resume.pdf")
}

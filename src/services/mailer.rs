use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP notification dispatcher.
///
/// Delivery outcome is reported as a plain boolean: transport errors are
/// caught and logged, never propagated to the pipeline.
pub struct Mailer {
    smtp_server: String,
    smtp_user: String,
    smtp_pass: String,
    from_email: String,
    booking_link: String,
}

const INVITATION_SUBJECT: &str = "Interview Invitation - Next Steps";

impl Mailer {
    pub fn new(
        smtp_server: &str,
        smtp_user: &str,
        smtp_pass: &str,
        from_email: &str,
        booking_link: &str,
    ) -> Self {
        Self {
            smtp_server: smtp_server.to_string(),
            smtp_user: smtp_user.to_string(),
            smtp_pass: smtp_pass.to_string(),
            from_email: from_email.to_string(),
            booking_link: booking_link.to_string(),
        }
    }

    /// Attempt delivery of a plain-text email, confirming the outcome.
    ///
    /// The blocking SMTP transport runs on the blocking pool; the result is
    /// awaited so the returned boolean reflects an actual handoff to the
    /// relay, not just a queued attempt.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> bool {
        let from = format!("Recruiting <{}>", self.from_email);
        let to = to.to_string();
        let subject = subject.to_string();
        let body = body.to_string();
        let server = self.smtp_server.clone();
        let creds = Credentials::new(self.smtp_user.clone(), self.smtp_pass.clone());

        let result = tokio::task::spawn_blocking(move || {
            let from_mailbox = from
                .parse()
                .map_err(|e| format!("invalid from address: {e}"))?;
            let to_mailbox = to
                .parse()
                .map_err(|e| format!("invalid recipient address: {e}"))?;

            let email = Message::builder()
                .from(from_mailbox)
                .to(to_mailbox)
                .subject(subject)
                .header(ContentType::TEXT_PLAIN)
                .body(body)
                .map_err(|e| format!("failed to build message: {e}"))?;

            let mailer = SmtpTransport::relay(&server)
                .map_err(|e| format!("failed to open SMTP relay: {e}"))?
                .credentials(creds)
                .build();

            mailer.send(&email).map_err(|e| format!("SMTP send failed: {e}"))
        })
        .await;

        match result {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Could not send notification email");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Email send task failed to execute");
                false
            }
        }
    }

    /// Send the interview-invitation template for a passing score.
    pub async fn send_interview_invitation(&self, to: &str, score: f64) -> bool {
        let body = invitation_body(score, &self.booking_link);
        self.send(to, INVITATION_SUBJECT, &body).await
    }
}

fn invitation_body(score: f64, booking_link: &str) -> String {
    format!(
        "\
Congratulations! Based on your application review (Match Score: {score}%), we would like to invite you for an interview.
Once you select a time slot, you will receive a detailed confirmation email with meeting instructions.
Please schedule your interview using the link below:
{booking_link}
Best regards,
Your Company Name
"
    )
}

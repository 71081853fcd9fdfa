pub mod email;

/// Fully rendered digest, ready for the transport.
#[derive(Debug, Clone)]
pub struct DigestEmail {
    pub subject: String,
    pub html: String,
    pub text: String, // plain-text alternative
}

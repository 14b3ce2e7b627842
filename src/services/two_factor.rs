use anyhow::{Result, anyhow};
use totp_rs::{Algorithm, Secret, TOTP};

/// Issuer stamped into otpauth URLs shown to authenticator apps.
const ISSUER: &str = "Payroll Administration";

/// Material produced when enrolling a user for two-factor authentication.
#[derive(Debug, Clone)]
pub struct Enrollment {
    /// Base32-encoded shared secret, stored with the user.
    pub secret: String,
    pub otpauth_url: String,
    /// PNG data URL of the otpauth QR code, returned once at creation time.
    pub qr_data_url: String,
}

fn totp_for(secret: Secret, account: &str) -> Result<TOTP> {
    TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        secret.to_bytes().map_err(|e| anyhow!("invalid TOTP secret: {:?}", e))?,
        Some(ISSUER.to_string()),
        account.to_string(),
    )
    .map_err(|e| anyhow!("failed to build TOTP: {}", e))
}

/// Generates a fresh secret and the enrollment material for a new user.
pub fn enroll(account: &str) -> Result<Enrollment> {
    let secret = Secret::generate_secret();
    let totp = totp_for(secret.clone(), account)?;
    let qr = totp
        .get_qr_base64()
        .map_err(|e| anyhow!("failed to render TOTP QR code: {}", e))?;

    Ok(Enrollment {
        secret: secret.to_encoded().to_string(),
        otpauth_url: totp.get_url(),
        qr_data_url: format!("data:image/png;base64,{}", qr),
    })
}

/// Checks a six-digit code against a stored base32 secret, allowing one time
/// step of clock skew.
pub fn verify(secret: &str, code: &str) -> Result<bool> {
    let totp = totp_for(Secret::Encoded(secret.to_string()), "")?;
    totp.check_current(code)
        .map_err(|e| anyhow!("system clock error: {}", e))
}

/// Current code for a stored secret. Test helper for exercising the login flow.
pub fn current_code(secret: &str) -> Result<String> {
    let totp = totp_for(Secret::Encoded(secret.to_string()), "")?;
    totp.generate_current()
        .map_err(|e| anyhow!("system clock error: {}", e))
}

// utils/validation.rs
use validator::ValidationError;

/// Niveaux d'éducation acceptés par le modèle
pub const EDUCATION_VALUES: [&str; 2] = ["Graduate", "Not Graduate"];

/// Valider le niveau d'éducation ("Graduate" / "Not Graduate")
pub fn validate_education(value: &str) -> Result<(), ValidationError> {
    if EDUCATION_VALUES.contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("education");
        err.message = Some("education must be 'Graduate' or 'Not Graduate'".into());
        Err(err)
    }
}

/// Valider le statut d'indépendant ("Yes" / "No")
pub fn validate_self_employed(value: &str) -> Result<(), ValidationError> {
    if value == "Yes" || value == "No" {
        Ok(())
    } else {
        let mut err = ValidationError::new("self_employed");
        err.message = Some("self_employed must be 'Yes' or 'No'".into());
        Err(err)
    }
}

/// Valider un code OTP (exactement 6 chiffres)
pub fn validate_otp_code(value: &str) -> Result<(), ValidationError> {
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("otp");
        err.message = Some("OTP must be exactly 6 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_values() {
        assert!(validate_education("Graduate").is_ok());
        assert!(validate_education("Not Graduate").is_ok());
        assert!(validate_education("PhD").is_err());
    }

    #[test]
    fn test_self_employed_values() {
        assert!(validate_self_employed("Yes").is_ok());
        assert!(validate_self_employed("No").is_ok());
        assert!(validate_self_employed("maybe").is_err());
    }

    #[test]
    fn test_otp_code_shape() {
        assert!(validate_otp_code("123456").is_ok());
        assert!(validate_otp_code("12345").is_err());
        assert!(validate_otp_code("12345a").is_err());
    }
}

/// Entity-local invariant violations. Constructors and setters return these
/// instead of producing an object in a bad state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid email: {value}")]
    InvalidEmail { value: String },

    #[error("credits must be between 1 and 4, got {credits}")]
    CreditsOutOfRange { credits: u8 },

    #[error("capacity must be positive")]
    CapacityNotPositive,

    #[error("capacity {requested} is below current enrollment {enrolled}")]
    CapacityBelowEnrollment { requested: usize, enrolled: usize },

    #[error("max credits must be at most 18, got {max_credits}")]
    MaxCreditsOutOfRange { max_credits: u8 },

    #[error("max credits {requested} is below current credit load {load}")]
    MaxCreditsBelowLoad { requested: u8, load: u32 },
}

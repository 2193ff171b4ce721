use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperError {
    #[error("fast axis length must be non-zero")]
    ZeroFastAxis,

    #[error("maximum velocity must be non-zero")]
    ZeroVelocity,

    #[error("acceleration must be non-zero")]
    ZeroAcceleration,

    #[error("clock frequency must be non-zero")]
    ZeroClock,

    #[error("tick arithmetic overflowed while planning {quantity}")]
    Overflow { quantity: &'static str },
}

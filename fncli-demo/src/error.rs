#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("can't divide {0} by zero")]
    DivideByZero(f64),

    #[error("need at least one number to average")]
    NoNumbers,
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found!")]
    UserNotFound,
    #[error("Incorrect password!")]
    WrongPassword,
    #[error("Current password is incorrect!")]
    WrongCurrentPassword,
    #[error("New passwords do not match!")]
    PasswordMismatch,
    #[error("This user is already registered!")]
    DuplicateUser,
    #[error("Record not found!")]
    RecordNotFound,
    #[error("Cart total does not match the order lines!")]
    CartTotalMismatch,
    #[error("Card has expired!")]
    CardExpired,
    #[error("Shopping cart is empty!")]
    EmptyCart,
    #[error("Internal error: {0}")]
    Internal(String),
}

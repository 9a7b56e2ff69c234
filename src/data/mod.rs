pub mod users;

pub use users::{
    admin, generate_unique_email, generate_user, student, InvalidCredentials, ProfileUpdate, Role,
    TestUser, NONEXISTENT_USER, UNKNOWN_ACCOUNT, WRONG_PASSWORD,
};

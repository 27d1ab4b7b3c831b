//! Application services for account administration.

mod directory;

pub use directory::{
    CreateUserRequest, UpdateProfileRequest, UpdateUserRequest, UserDirectoryError,
    UserDirectoryResult, UserDirectoryService,
};

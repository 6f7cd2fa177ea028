pub mod contact;
pub mod events;
pub mod subscribe;
pub mod subscribe_confirm;

pub use contact::contact;
pub use events::events;
pub use subscribe::subscribe;
pub use subscribe_confirm::subscribe_confirm;

//! Domain models for the marketplace API.

pub mod admin_user;
pub mod car;
pub mod settings;

pub use admin_user::AdminUser;
pub use car::{Car, CarFilter, CarForm, CarPage, CarPatch, CarSort, NewCar, Pagination};
pub use settings::{
    ApiKeySummary, AppearanceSettings, AppearanceSettingsPatch, AppearanceSettingsUpdate,
    ContentPages, ContentPagesPatch, ContentPagesUpdate, FeeStructure, FeeStructurePatch,
    FeeStructureUpdate, NotificationSettings, NotificationSettingsPatch,
    NotificationSettingsUpdate, SessionRecord, SettingsDocument,
};

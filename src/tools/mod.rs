pub mod catalogcheck;

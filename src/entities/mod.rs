pub mod assets;
pub mod inventory_items;
pub mod roles;
pub mod users;
pub mod work_orders;

pub mod catalog_handlers;
pub mod customer_handlers;
pub mod rental_handlers;
pub mod report_handlers;

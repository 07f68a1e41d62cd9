//! Catalogue products sold through orders

use crate::core::transition::{TransitionTable, Workflow};

crate::status_enum!(
    ProductStatus,
    "product status",
    {
        Active => ("active", "Active", "check-circle", Success),
        Inactive => ("inactive", "Inactive", "pause-circle", Secondary),
        OutOfStock => ("out_of_stock", "Out of stock", "alert-triangle", Warning),
        Discontinued => ("discontinued", "Discontinued", "archive", Destructive),
    }
);

crate::impl_record!(
    Product,
    "product",
    "products",
    ProductStatus,
    search: [name, sku],
    {
        name: String,
        sku: String,
        category: String,
        price: f64,
        stock: u32,
    }
);

impl Workflow for Product {
    fn default_transitions() -> TransitionTable<ProductStatus> {
        use ProductStatus::*;
        TransitionTable::new()
            .allow(Active, [Inactive, OutOfStock, Discontinued])
            .allow(Inactive, [Active, Discontinued])
            .allow(OutOfStock, [Active, Discontinued])
    }

    fn terminal_statuses() -> &'static [ProductStatus] {
        &[ProductStatus::Discontinued]
    }
}

//! Orders placed by patients, fulfilled by the clinic

use crate::core::transition::{TransitionTable, Workflow};

crate::status_enum!(
    OrderStatus,
    "order status",
    {
        Pending => ("pending", "Pending", "clock", Warning),
        Confirmed => ("confirmed", "Confirmed", "check-circle", Default),
        Processing => ("processing", "Processing", "package", Secondary),
        Shipped => ("shipped", "Shipped", "truck", Default),
        Delivered => ("delivered", "Delivered", "check-circle-2", Success),
        Cancelled => ("cancelled", "Cancelled", "x-circle", Destructive),
        Refunded => ("refunded", "Refunded", "rotate-ccw", Outline),
    }
);

crate::impl_record!(
    Order,
    "order",
    "orders",
    OrderStatus,
    search: [order_number, patient_name, patient_email, coach_name],
    {
        /// Human-facing number, e.g. "ORD-2024-001"
        order_number: String,
        patient_name: String,
        patient_email: String,
        /// Snapshot of the assigned coach at order time
        coach_name: Option<String>,
        product_name: String,
        quantity: u32,
        total_amount: f64,
    }
);

impl Workflow for Order {
    fn default_transitions() -> TransitionTable<OrderStatus> {
        use OrderStatus::*;
        TransitionTable::new()
            .allow(Pending, [Confirmed, Cancelled])
            .allow(Confirmed, [Processing, Cancelled])
            .allow(Processing, [Shipped])
            .allow(Shipped, [Delivered])
            .allow(Delivered, [Refunded])
    }

    fn terminal_statuses() -> &'static [OrderStatus] {
        &[OrderStatus::Cancelled, OrderStatus::Refunded]
    }
}

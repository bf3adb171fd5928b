pub mod invoice_store;

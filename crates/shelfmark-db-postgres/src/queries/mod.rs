//! SQL query implementations for the catalog.
//!
//! Split per entity; each module maps tuple rows into the domain structs
//! and uses `RETURNING` on writes so the caller observes store-assigned
//! values (the generated id in particular).

pub mod authors;
pub mod books;

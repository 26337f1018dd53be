//! Testing utilities for Folio.
//!
//! Record assertions built on the deep-equality comparator of
//! `folio-validation`. An expected record is a *shape*: only its keys are
//! checked, so a test can pin the fields it cares about and ignore ids,
//! timestamps and other generated values.
//!
//! ## Quick Start
//!
//! ```
//! use folio_testing::*;
//! use serde_json::json;
//!
//! let author = json!({"id": 7, "name": "Le Guin", "books": [{"id": 1, "title": "Lavinia"}]});
//! assert_record_matches(&author, &json!({"name": "Le Guin", "books": [{"title": "Lavinia"}]}));
//!
//! let outcome = check_record(&author, &json!({"name": "Tolkien"}));
//! assert!(!outcome.passed);
//! assert_eq!(outcome.message, "record does not match expected shape: $.name: expected \"Tolkien\", found \"Le Guin\"");
//! ```

mod assertions;

pub use assertions::*;

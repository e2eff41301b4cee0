//! # caseforge - business process to CMMN compiler
//!
//! **caseforge** turns an abstract description of a case-management process (tasks,
//! their outcomes, and sequencing patterns between them) into a CMMN 1.1 document in
//! the Flowable dialect, complete with a computed diagram: shapes that never overlap,
//! sentries anchored on their tasks, and routed edges.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Data**: Deserialize the business logic JSON, or implement
//!     [`IntoBusinessLogic`](logic::IntoBusinessLogic) for your own structs.
//! 2.  **Configure**: Use `Compiler::builder` to pick the case name, the layout mode and
//!     the layout dimensions.
//! 3.  **Compile**: `compile` validates the graph, lays it out, routes sentries,
//!     synthesizes their conditions and emits the document. The same input always
//!     produces the same bytes.
//! 4.  **Inspect**: [`inspector::inspect`] checks an existing document and
//!     [`inspector::reconstruct`] recovers its business logic.
//!
//! ## Quick Start
//!
//! ```rust
//! use caseforge::prelude::*;
//!
//! let logic = r#"{
//!     "tasks": [
//!         { "slug": "submit", "displayName": "Submit", "outcomes": ["submitted"] },
//!         { "slug": "review", "displayName": "Review", "outcomes": ["approved", "rejected"] }
//!     ],
//!     "patterns": [
//!         { "type": "sequential", "tasks": ["submit", "review"] }
//!     ]
//! }"#;
//!
//! let compiled = Compiler::from_source(logic, "expenses")
//!     .unwrap()
//!     .case_name("claims")
//!     .build()
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(compiled.case_key, "claims_expenses");
//! assert!(inspect(&compiled.xml).is_valid());
//! ```

pub mod compiler;
pub mod condition;
pub mod emitter;
pub mod error;
pub mod inspector;
pub mod layout;
pub mod logic;
pub mod naming;
pub mod prelude;
pub mod routing;

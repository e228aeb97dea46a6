mod notebook;
mod project;
mod roster;
mod unit;

pub use notebook::{BatchCreate, CreateNotebook, Notebook, ReassignNotebook, MAX_BATCH};
pub use project::{CreateProject, Project};
pub use roster::{NotebookRef, ScannerData, Summary, UnitGroup, UnitRef};
pub use unit::{MobileUnit, UnitInput};

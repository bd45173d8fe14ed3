/// Core engines
///
/// Each engine owns one slice of the domain and is constructed from the
/// repository traits (plus the token and mail seams where needed):
///
/// - [`membership`]: the single authorization gate plus the
///   invite/activate lifecycle of the project-member relation
/// - [`project`]: project creation with the owner membership
/// - [`task`]: task lifecycle, per-column ordering, assignment, and the
///   project deletion cascade
/// - [`invite`]: emailed tokenized invitations and the join flows
/// - [`views`]: read-only composite views across the stores
///
/// All operations are short-lived request/response calls with no in-process
/// locking; the store's per-row atomicity is the only consistency unit.
pub mod invite;
pub mod membership;
pub mod project;
pub mod task;
pub mod views;

pub mod board;
pub mod card;
pub mod card_lifecycle;
pub mod column;
pub mod field_update;
pub mod placement;
pub mod policy;
pub mod position;
pub mod snapshot;
pub mod status;
pub mod transition;
pub mod view;

pub use board::{Board, BoardId, BoardKind, BoardVariant};
pub use card::{Card, CardId, CardOrigin, CardPriority, CardUpdate, NewCard};
pub use column::{Column, ColumnId};
pub use field_update::FieldUpdate;
pub use placement::PlacementKey;
pub use policy::{policy_for, BoardPolicy};
pub use position::{Insertion, PositionIndex};
pub use snapshot::BoardSnapshot;
pub use status::{StatusCatalog, StatusId};
pub use transition::{MoveProposal, SideEffects, TransitionDecision, TransitionPolicy};
pub use view::{Bucket, PlacementView};

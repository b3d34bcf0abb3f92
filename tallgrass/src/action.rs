use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tallgrass_core::Direction;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // Menu cursor (starter list or move list)
    CursorNext,
    CursorPrev,
    Confirm,

    // Engine commands
    StarterChoose(String),
    Move(Direction),
    BattleAttack(String),
    Restart,

    Quit,
}

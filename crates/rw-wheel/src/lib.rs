//! # rw-wheel — RaffleWheel game engine
//!
//! Two randomized-selection games sharing one page: a hold-to-spin number
//! wheel that draws without replacement, and a scratch card concealing one
//! randomly chosen text option.
//!
//! ## Architecture
//!
//! ```text
//! RaffleSession<S: FrameScheduler, R: RandomSource>
//!     │
//!     ├── PoolManager (number pool + history, text options)
//!     ├── SpinEngine (hold / glide physics)
//!     │       └── pick_winning_index (on stop)
//!     ├── ScratchCard (concealed answer, erase strokes)
//!     └── render (state → Vec<DrawCommand>)
//! ```
//!
//! Nothing here touches a real clock or drawing surface; hosts supply a
//! `FrameScheduler` and replay `DrawCommand`s.

pub mod physics;
pub mod pool;
pub mod render;
pub mod scheduler;
pub mod scratch;
pub mod selector;
pub mod session;

pub use physics::*;
pub use pool::*;
pub use render::*;
pub use scheduler::*;
pub use scratch::*;
pub use selector::*;
pub use session::*;

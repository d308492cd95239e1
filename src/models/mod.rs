mod ladder;
mod question;

pub use ladder::PrizeLadderEntry;
pub use question::{NUM_OPTIONS, Question, QuestionError};

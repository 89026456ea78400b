use super::Recognizer;
use crate::{
    Segment,
    grammar::LanguageContext,
    input::Cursor,
    node::Node,
    path::SymbolPath,
    result::{RecognitionError, RecognitionResult},
};

/// Succeeds, with an empty atom, only once the input has been exhausted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EndOfInput;

impl Recognizer for EndOfInput {
    fn try_recognize(
        &self,
        cursor: &mut Cursor<'_>,
        path: &SymbolPath,
        _: &LanguageContext<'_>,
    ) -> RecognitionResult {
        let pos = cursor.position();
        if cursor.is_at_end() {
            Ok(Node::atom(path.symbol(), Segment::empty(pos)))
        } else {
            Err(RecognitionError::failed(path, pos))
        }
    }
}

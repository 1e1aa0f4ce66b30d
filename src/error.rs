use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

pub(crate) use malformed_error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The analysis itself never fails: any query whose answer is unknown returns `None` (soft
/// "no information", see the reflection module). Errors only arise while assembling method
/// bodies and building control flow graphs from them, where a structurally malformed input
/// must be rejected before analysis starts.
///
/// # Error Categories
///
/// - [`Error::Malformed`] - Structurally invalid method body (bad branch target, unresolved
///   label, instruction stream inconsistencies)
/// - [`Error::GraphError`] - Control flow graph construction failure
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::{Error, assembly::split_blocks};
///
/// match split_blocks(&instructions) {
///     Ok(blocks) => println!("{} basic blocks", blocks.len()),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed body: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The method body is damaged and could not be processed.
    ///
    /// This error indicates that an instruction stream does not form a valid method body,
    /// e.g. a branch whose target is not an instruction boundary or an assembler label that
    /// was referenced but never bound. The error includes the source location where the
    /// malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Control flow graph error.
    ///
    /// Errors related to building the control flow graph from basic blocks, such as an
    /// empty block list or a successor index that exceeds the block count.
    #[error("{0}")]
    GraphError(String),
}

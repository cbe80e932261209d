// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use thiserror::Error;

/// Recoverable errors of the state cache. Misuse of the push/pop discipline is not an error, it
/// panics.
#[derive(Debug, Error)]
pub enum StateError {
    /// More than one entry was passed to a setter, but the device has no indexed entry point for
    /// the state family. Nothing is sent to the device in this case.
    #[error(
        "Unable to set {} {}s at once: the device does not support indexed {}s",
        count,
        family,
        family
    )]
    IndexedPathUnsupported {
        /// Human-readable name of the state family.
        family: &'static str,
        /// Amount of requested entries.
        count: usize,
    },
}

#[cfg(test)]
mod test {
    use super::StateError;

    #[test]
    fn test_indexed_path_error_message() {
        let error = StateError::IndexedPathUnsupported {
            family: "scissor",
            count: 3,
        };
        assert_eq!(
            error.to_string(),
            "Unable to set 3 scissors at once: the device does not support indexed scissors"
        );
    }
}

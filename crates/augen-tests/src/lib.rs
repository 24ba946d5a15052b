//! Downstream test crate: exercises the generated contract the way an
//! integration layer would, through the public macros only.

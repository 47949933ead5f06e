//! Composable processing stages
//!
//! Every step of the pipeline (tokenize, build, construct, sort, serialize) is a [Runnable]
//! stage. [Transform] chains stages with [Transform::then]; the compiler checks that each
//! stage's input is the previous stage's output:
//!
//! ```rust,ignore
//! let canonical = Transform::from_fn(Ok)
//!     .then(Tokenize::new(Dialect::Dhcpd))   // String -> Vec<Token>
//!     .then(BuildTree)                       // Vec<Token> -> RootNode
//!     .then(Sort::new(Dialect::Dhcpd))       // RootNode -> RootNode
//!     .then(SerializeTree::new(options));    // RootNode -> String
//! ```
//!
//! Common chains are prebuilt as statics in [standard].
//!
//! # Modules
//!
//! - [stages]: the individual stages
//! - [standard]: prebuilt pipelines per dialect

pub mod stages;
pub mod standard;

use crate::isc::error::IscError;

/// One processing step from `I` to `O`.
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, IscError>;
}

/// A chain of stages from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, IscError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, IscError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Append a stage, producing a transform from `I` to the stage's output.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Append a prebuilt static transform.
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, IscError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, IscError> {
        Transform::run(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::error::StructureError;

    struct Double;
    impl Runnable<i32, i32> for Double {
        fn run(&self, input: i32) -> Result<i32, IscError> {
            Ok(input * 2)
        }
    }

    struct Describe;
    impl Runnable<i32, String> for Describe {
        fn run(&self, input: i32) -> Result<String, IscError> {
            Ok(format!("n={}", input))
        }
    }

    struct Fail;
    impl Runnable<i32, i32> for Fail {
        fn run(&self, _input: i32) -> Result<i32, IscError> {
            Err(StructureError::UnexpectedClose { line: 1, column: 1 }.into())
        }
    }

    #[test]
    fn test_stages_chain_in_order() {
        let transform = Transform::from_fn(|x: i32| Ok(x + 1))
            .then(Double)
            .then(Describe);
        assert_eq!(transform.run(4).unwrap(), "n=10");
    }

    #[test]
    fn test_error_stops_the_chain() {
        let transform = Transform::from_fn(|x: i32| Ok(x)).then(Fail).then(Double);
        assert!(matches!(transform.run(1), Err(IscError::Structure(_))));
    }
}

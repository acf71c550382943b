//! Macros for declaring lifecycle state enums.

/// Generate a state enum together with its `State` implementation.
///
/// Variants marked `final` are terminal; variants marked `error` are both
/// terminal and the failure classification.
///
/// # Example
///
/// ```
/// use cadence::lifecycle_states;
/// use cadence::core::State;
///
/// lifecycle_states! {
///     pub enum CommandState {
///         Initialized,
///         Validating,
///         Executing,
///         final Succeeded,
///         error Failed,
///     }
/// }
///
/// assert!(CommandState::Succeeded.is_terminal());
/// assert!(CommandState::Failed.is_failure());
/// assert!(!CommandState::Executing.is_terminal());
/// ```
#[macro_export]
macro_rules! lifecycle_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($body:tt)* }
    ) => {
        $crate::lifecycle_states!(@parse
            meta = [$(#[$meta])*],
            vis = [$vis],
            name = $name,
            variants = [],
            finals = [],
            errors = [],
            rest = [$($body)*]
        );
    };

    // error variant: terminal and the failure position
    (@parse
        meta = [$($meta:tt)*], vis = [$($vis:tt)*], name = $name:ident,
        variants = [$($variants:ident)*], finals = [$($finals:ident)*], errors = [$($errors:ident)*],
        rest = [error $v:ident $(, $($rest:tt)*)?]
    ) => {
        $crate::lifecycle_states!(@parse
            meta = [$($meta)*], vis = [$($vis)*], name = $name,
            variants = [$($variants)* $v], finals = [$($finals)* $v], errors = [$($errors)* $v],
            rest = [$($($rest)*)?]
        );
    };

    // final variant: terminal only
    (@parse
        meta = [$($meta:tt)*], vis = [$($vis:tt)*], name = $name:ident,
        variants = [$($variants:ident)*], finals = [$($finals:ident)*], errors = [$($errors:ident)*],
        rest = [final $v:ident $(, $($rest:tt)*)?]
    ) => {
        $crate::lifecycle_states!(@parse
            meta = [$($meta)*], vis = [$($vis)*], name = $name,
            variants = [$($variants)* $v], finals = [$($finals)* $v], errors = [$($errors)*],
            rest = [$($($rest)*)?]
        );
    };

    // plain variant
    (@parse
        meta = [$($meta:tt)*], vis = [$($vis:tt)*], name = $name:ident,
        variants = [$($variants:ident)*], finals = [$($finals:ident)*], errors = [$($errors:ident)*],
        rest = [$v:ident $(, $($rest:tt)*)?]
    ) => {
        $crate::lifecycle_states!(@parse
            meta = [$($meta)*], vis = [$($vis)*], name = $name,
            variants = [$($variants)* $v], finals = [$($finals)*], errors = [$($errors)*],
            rest = [$($($rest)*)?]
        );
    };

    // all variants consumed: emit the enum and its State impl
    (@parse
        meta = [$($meta:tt)*], vis = [$($vis:tt)*], name = $name:ident,
        variants = [$($variants:ident)*], finals = [$($finals:ident)*], errors = [$($errors:ident)*],
        rest = []
    ) => {
        $($meta)*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $($vis)* enum $name {
            $($variants),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variants => stringify!($variants)),*
                }
            }

            fn is_terminal(&self) -> bool {
                match self {
                    $(Self::$finals => true,)*
                    _ => false,
                }
            }

            fn is_failure(&self) -> bool {
                match self {
                    $(Self::$errors => true,)*
                    _ => false,
                }
            }
        }
    };
}

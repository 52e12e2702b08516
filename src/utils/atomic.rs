use serde::{Deserialize, Serialize};
use std::{marker::PhantomData, sync::atomic};

pub struct Primitive<P, A>
where
    P: Copy,
    A: From<P>,
{
    v: A,
    phantom_data: PhantomData<P>,
}

pub trait SimpleAtomic<T>
where
    T: Copy,
{
    const ORDER: atomic::Ordering = atomic::Ordering::Relaxed;
    fn load(&self) -> T;
    fn store(&self, v: T);
}

impl<P, A> From<P> for Primitive<P, A>
where
    P: Copy,
    A: From<P>,
{
    fn from(v: P) -> Self {
        Self {
            v: A::from(v),
            phantom_data: PhantomData::<P> {},
        }
    }
}

macro_rules! impl_simple_atomic {
    ($name:ident,$p:ty,$ps:literal,$a:ty) => {
        impl SimpleAtomic<$p> for Primitive<$p, $a> {
            fn load(&self) -> $p {
                self.v.load(Self::ORDER)
            }
            fn store(&self, v: $p) {
                self.v.store(v, Self::ORDER)
            }
        }
        impl Clone for Primitive<$p, $a> {
            fn clone(&self) -> Self {
                Self::from(self.load())
            }
        }
        #[derive(Clone, Serialize, Deserialize)]
        #[serde(from = $ps, into = $ps)]
        pub struct $name(Primitive<$p, $a>);

        impl $name {
            pub fn new(v: $p) -> Self {
                Self::from(v)
            }
        }
        impl SimpleAtomic<$p> for $name {
            fn load(&self) -> $p {
                self.0.load()
            }
            fn store(&self, v: $p) {
                self.0.store(v)
            }
        }
        impl From<$p> for $name {
            fn from(v: $p) -> Self {
                $name(Primitive::<$p, $a>::from(v))
            }
        }
        impl From<$name> for $p {
            fn from(v: $name) -> $p {
                v.load()
            }
        }
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:?}", self.load())
            }
        }
    };
}

impl_simple_atomic!(Bool, bool, "bool", atomic::AtomicBool);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boolean() {
        let t = Bool::from(true);
        t.store(false);
        let v: bool = t.into();
        assert!(!v);
    }

    #[test]
    fn serialize() {
        let t = Bool::new(true);
        let json = serde_json::to_string_pretty(&t).unwrap();
        assert_eq!(json, "true");
        let back: Bool = serde_json::from_str("false").unwrap();
        assert!(!back.load());
    }
}

/*
Copied and modified from github.com/dnaq/sodiumoxide

Copyright (c) 2013 Daniel Ashhami

Permission is hereby granted, free of charge, to any person obtaining
a copy of this software and associated documentation files (the
"Software"), to deal in the Software without restriction, including
without limitation the rights to use, copy, modify, merge, publish,
distribute, sublicense, and/or sell copies of the Software, and to
permit persons to whom the Software is furnished to do so, subject to
the following conditions:

The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

*/


macro_rules! newtype_from_slice (($newtype:ident, $len:expr) => (
    /// `from_slice()` creates an object from a byte slice
    ///
    /// This function will fail and return `None` if the length of
    /// the byte slice isn't equal to the length of the object
    pub fn from_slice(bs: &[u8]) -> Option<$newtype> {
        if bs.len() != $len {
            return None;
        }
        let mut n = $newtype([0; $len]);
        {
            let $newtype(ref mut b) = n;
            b.copy_from_slice(bs);
        }
        Some(n)
    }

    pub fn from_rng<R: ::rand::Rng + ?Sized>(rng: &mut R) -> $newtype {
        let mut n = $newtype([0; $len]);
        {
            let $newtype(ref mut b) = n;
            rng.fill_bytes(b);
        }
        n
    }

    pub fn to_hex(&self) -> String {
        use ::data_encoding::HEXLOWER_PERMISSIVE;
        HEXLOWER_PERMISSIVE.encode(&self[..])
    }
));

macro_rules! newtype_traits (($newtype:ident, $len:expr) => (
    impl ::subtle::ConstantTimeEq for $newtype {
        fn ct_eq(&self, other: &Self) -> ::subtle::Choice {
            let &$newtype(ref v) = self;
            let &$newtype(ref o) = other;
            v.ct_eq(o)
        }
    }

    impl ::std::cmp::PartialEq for $newtype {
        fn eq(&self, other: &Self) -> bool {
            use ::subtle::ConstantTimeEq;

            self.ct_eq(other).into()
        }
    }

    impl ::std::cmp::Eq for $newtype {}

    impl ::serde::Serialize for $newtype {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where S: ::serde::Serializer
        {
            use ::data_encoding::HEXLOWER_PERMISSIVE;
            serializer.serialize_str(&HEXLOWER_PERMISSIVE.encode(&self[..]))
        }
    }

    impl<'de> ::serde::Deserialize<'de> for $newtype {
        fn deserialize<D>(deserializer: D) -> Result<$newtype, D::Error>
            where D: ::serde::Deserializer<'de>
        {
            struct NewtypeVisitor;
            impl<'de> ::serde::de::Visitor<'de> for NewtypeVisitor {
                type Value = $newtype;
                fn expecting(&self, formatter: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                    write!(formatter, stringify!($newtype))
                }

                fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where E: ::serde::de::Error
                {
                    use ::data_encoding::HEXLOWER_PERMISSIVE;
                    let slice = HEXLOWER_PERMISSIVE.decode(v.as_bytes()).map_err(::serde::de::Error::custom)?;
                    $newtype::from_slice(&slice).ok_or_else(|| ::serde::de::Error::invalid_length(slice.len(), &self))
                }
            }
            deserializer.deserialize_str(NewtypeVisitor)
        }
    }

    /// Allows a user to access the byte contents of an object as a slice.
    ///
    /// WARNING: it might be tempting to do comparisons on objects
    /// by using `x[a..b] == y[a..b]`. This opens up for timing attacks
    /// when comparing e.g. MAC tags. Only use the comparison functions
    /// exposed by this type's own PartialEq/ConstantTimeEq impl.
    impl ::std::ops::Index<::std::ops::RangeFull> for $newtype {
        type Output = [u8];
        fn index(&self, _index: ::std::ops::RangeFull) -> &[u8] {
            let &$newtype(ref b) = self;
            b.index(_index)
        }
    }

    impl ::std::fmt::Debug for $newtype  {
        fn fmt(&self,
               formatter: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
            write!(formatter, "{}({:?})", stringify!($newtype), &self[..])
        }
    }
    ));

macro_rules! public_newtype_traits (($newtype:ident) => (
    impl AsRef<[u8]> for $newtype {
        #[inline]
        fn as_ref(&self) -> &[u8] {
            &self[..]
        }
    }

    impl Clone for $newtype {
        fn clone(&self) -> $newtype {
            let &$newtype(v) = self;
            $newtype(v)
        }
    }
    ));

/// Macro used for generating newtypes of byte-arrays.
///
/// `secret` variants are zeroized on drop and are never `Copy`, so that a
/// caller cannot accidentally duplicate key material. `public` variants are
/// `Copy` and carry no zeroizing drop glue.
macro_rules! new_type {
    ( $(#[$meta:meta])*
      secret $name:ident($bytes:expr);
      ) => (
        $(#[$meta])*
        #[must_use]
        #[derive(::zeroize::Zeroize, ::zeroize::ZeroizeOnDrop)]
        pub struct $name(pub [u8; $bytes]);
        impl Clone for $name {
            fn clone(&self) -> $name {
                let &$name(v) = self;
                $name(v)
            }
        }
        newtype_traits!($name, $bytes);
        impl $name {
            newtype_from_slice!($name, $bytes);
        }
        );
    ( $(#[$meta:meta])*
      public $name:ident($bytes:expr);
      ) => (
        $(#[$meta])*
        #[derive(Copy)]
        #[must_use]
        pub struct $name(pub [u8; $bytes]);
        newtype_traits!($name, $bytes);
        public_newtype_traits!($name);
        impl $name {
            newtype_from_slice!($name, $bytes);
        }
        );
}

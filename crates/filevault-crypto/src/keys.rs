//! Fixed-size symmetric key, salt, and tag types.
//!
//! RSA keys (used for asymmetric encryption and signing) are not fixed-size
//! byte arrays and so are not newtypes here; they live in [`crate::pke`] and
//! [`crate::sign`] wrapping the `rsa` crate's own key types directly.

new_type!(
    /// Password-derived root key. Never stored; only ever held in memory long
    /// enough to derive `EncKey`/`MacKey` via HKDF.
    secret RootKey(16);
);

new_type!(
    /// Symmetric encryption subkey (AES-128-CTR).
    secret EncKey(16);
);

new_type!(
    /// Symmetric MAC subkey (HMAC-SHA-512).
    secret MacKey(16);
);

new_type!(
    /// Per-file symmetric key protecting a file's content chain and metadata node.
    secret FileKey(16);
);

new_type!(
    /// Ephemeral key wrapped by RSA-OAEP in an asymmetric seal, used to key the
    /// inner symmetric envelope that actually protects the sealed payload.
    secret SessionKey(32);
);

new_type!(
    /// Random per-user salt for Argon2 root-key derivation. Stored unencrypted.
    public Salt(32);
);

new_type!(
    /// Fresh per-call AES-CTR initialization vector, stored alongside its ciphertext.
    public Iv(16);
);

new_type!(
    /// HMAC-SHA-512 authentication tag.
    public MacTag(64);
);

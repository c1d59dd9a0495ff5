//! Per-algorithm key format and key validation rules.

use rand::SeedableRng;
use rand::rngs::StdRng;
use signet_jwt::keys::{
    JwtEcdsaKeyFormat, JwtEcdsaPrivateKey, JwtHmacKey, JwtHmacKeyFormat, JwtPrivateKey,
    JwtPublicKey, JwtRsaSsaPkcs1KeyFormat, JwtRsaSsaPkcs1PublicKey, JwtRsaSsaPssKeyFormat,
    ecdsa, hmac, rsa,
};
use signet_jwt::{Algorithm, ErrorKind};

const F4: [u8; 3] = [0x01, 0x00, 0x01]; // 65537

fn rng() -> StdRng {
    StdRng::seed_from_u64(0xface)
}

#[test]
fn test_hmac_keys_below_the_floor_are_rejected() {
    for (algorithm, floor) in [
        (Algorithm::HS256, 32),
        (Algorithm::HS384, 48),
        (Algorithm::HS512, 64),
    ] {
        assert!(
            JwtHmacKey::new(algorithm, vec![0u8; floor - 1]).is_err(),
            "{algorithm} accepted {} bytes",
            floor - 1
        );
        let key = JwtHmacKey::new(algorithm, vec![0u8; floor])
            .unwrap_or_else(|_| panic!("{algorithm} rejected {floor} bytes"));
        assert_eq!(key.version(), 0);
        assert_eq!(key.key_value().len(), floor);
    }
}

#[test]
fn test_hmac_format_floors_apply_to_generation() {
    let err = JwtHmacKey::generate(
        &JwtHmacKeyFormat {
            algorithm: Algorithm::HS256,
            key_size: 31,
        },
        &mut rng(),
    )
    .expect_err("31-byte HS256 format");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let key = JwtHmacKey::generate(
        &JwtHmacKeyFormat {
            algorithm: Algorithm::HS256,
            key_size: 48,
        },
        &mut rng(),
    )
    .expect("48-byte HS256 key");
    // exactly the requested size, not just the floor
    assert_eq!(key.key_value().len(), 48);
}

#[test]
fn test_hmac_format_rejects_asymmetric_algorithms() {
    assert!(
        JwtHmacKeyFormat {
            algorithm: Algorithm::ES256,
            key_size: 32,
        }
        .validate()
        .is_err()
    );
}

#[test]
fn test_rsa_format_floors_per_algorithm() {
    for (algorithm, floor) in [
        (Algorithm::RS256, 2048),
        (Algorithm::RS384, 3072),
        (Algorithm::RS512, 4096),
    ] {
        let ok = JwtRsaSsaPkcs1KeyFormat {
            algorithm,
            modulus_size_bits: floor,
            public_exponent: F4.to_vec(),
        };
        assert!(ok.validate().is_ok(), "{algorithm} rejected {floor} bits");

        let short = JwtRsaSsaPkcs1KeyFormat {
            modulus_size_bits: floor - 1,
            ..ok
        };
        assert!(short.validate().is_err(), "{algorithm} accepted short modulus");
    }

    for (algorithm, floor) in [
        (Algorithm::PS256, 2048),
        (Algorithm::PS384, 3072),
        (Algorithm::PS512, 4096),
    ] {
        let ok = JwtRsaSsaPssKeyFormat {
            algorithm,
            modulus_size_bits: floor,
            public_exponent: F4.to_vec(),
        };
        assert!(ok.validate().is_ok(), "{algorithm} rejected {floor} bits");
    }

    // families do not mix
    assert!(
        JwtRsaSsaPkcs1KeyFormat {
            algorithm: Algorithm::PS256,
            modulus_size_bits: 2048,
            public_exponent: F4.to_vec(),
        }
        .validate()
        .is_err()
    );
}

#[test]
fn test_rsa_public_exponent_rules() {
    let format = |public_exponent: Vec<u8>| JwtRsaSsaPkcs1KeyFormat {
        algorithm: Algorithm::RS256,
        modulus_size_bits: 2048,
        public_exponent,
    };

    assert!(format(F4.to_vec()).validate().is_ok());
    // below the floor
    assert!(format(vec![0x03]).validate().is_err());
    assert!(format(vec![0x01, 0x00, 0x00]).validate().is_err());
    // large enough but even
    assert!(format(vec![0x01, 0x00, 0x02]).validate().is_err());
    // odd and above the floor
    assert!(format(vec![0x01, 0x00, 0x03]).validate().is_ok());
}

#[test]
fn test_rsa_public_key_modulus_is_checked() {
    // far too small to be a 2048-bit modulus
    let err = JwtRsaSsaPkcs1PublicKey::new(Algorithm::RS256, vec![0xffu8; 64], F4.to_vec())
        .expect_err("short modulus");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_ecdsa_generation_and_projection() {
    let private_key = JwtEcdsaPrivateKey::generate(
        &JwtEcdsaKeyFormat {
            algorithm: Algorithm::ES256,
        },
        &mut rng(),
    )
    .expect("key pair");
    assert_eq!(private_key.public_key().x().len(), 32);
    assert_eq!(private_key.public_key().y().len(), 32);
    assert_eq!(private_key.key_value().len(), 32);
    assert_eq!(private_key.public_key().version(), 0);

    let private: JwtPrivateKey = private_key.into();
    let public = private.public_key();
    assert_eq!(public.algorithm(), Algorithm::ES256);
    assert!(matches!(public, JwtPublicKey::Ecdsa(_)));
    assert!(public.validate().is_ok());
}

#[test]
fn test_ecdsa_format_rejects_foreign_algorithms() {
    assert!(
        JwtEcdsaKeyFormat {
            algorithm: Algorithm::HS256,
        }
        .validate()
        .is_err()
    );
    let err = JwtEcdsaPrivateKey::generate(
        &JwtEcdsaKeyFormat {
            algorithm: Algorithm::RS256,
        },
        &mut rng(),
    )
    .expect_err("RS256 is not an EC algorithm");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_derive_key_is_unimplemented_everywhere() {
    let err = hmac::derive_key(
        &JwtHmacKeyFormat {
            algorithm: Algorithm::HS256,
            key_size: 32,
        },
        b"salt",
    )
    .expect_err("derive_key");
    assert_eq!(err.kind(), ErrorKind::Unimplemented);

    let err = ecdsa::derive_key(
        &JwtEcdsaKeyFormat {
            algorithm: Algorithm::ES256,
        },
        b"salt",
    )
    .expect_err("derive_key");
    assert_eq!(err.kind(), ErrorKind::Unimplemented);

    let err = rsa::derive_pkcs1_key(
        &JwtRsaSsaPkcs1KeyFormat {
            algorithm: Algorithm::RS256,
            modulus_size_bits: 2048,
            public_exponent: F4.to_vec(),
        },
        b"salt",
    )
    .expect_err("derive_key");
    assert_eq!(err.kind(), ErrorKind::Unimplemented);

    let err = rsa::derive_pss_key(
        &JwtRsaSsaPssKeyFormat {
            algorithm: Algorithm::PS256,
            modulus_size_bits: 2048,
            public_exponent: F4.to_vec(),
        },
        b"salt",
    )
    .expect_err("derive_key");
    assert_eq!(err.kind(), ErrorKind::Unimplemented);
}

#[test]
fn test_type_urls_are_distinct() {
    let urls = [
        hmac::JWT_HMAC_KEY_TYPE_URL,
        ecdsa::JWT_ECDSA_PRIVATE_KEY_TYPE_URL,
        ecdsa::JWT_ECDSA_PUBLIC_KEY_TYPE_URL,
        rsa::JWT_RSA_SSA_PKCS1_PRIVATE_KEY_TYPE_URL,
        rsa::JWT_RSA_SSA_PKCS1_PUBLIC_KEY_TYPE_URL,
        rsa::JWT_RSA_SSA_PSS_PRIVATE_KEY_TYPE_URL,
        rsa::JWT_RSA_SSA_PSS_PUBLIC_KEY_TYPE_URL,
    ];
    for (i, url) in urls.iter().enumerate() {
        assert!(url.starts_with("type.signet.dev/jwt.Jwt"));
        assert!(!urls[i + 1..].contains(url), "duplicate type url {url}");
    }
}

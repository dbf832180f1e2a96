//! Package identity derivation.
//!
//! Generated code addresses other generated packages by a `(identifier,
//! import path)` pair. The pair is derived from the file's declared package
//! override when present, otherwise from the proto package name.

/// The resolved `(identifier, path)` pair for one schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    /// Package identifier used to qualify symbols
    pub name: String,
    /// Import path of the package
    pub path: String,
}

impl PackageIdentity {
    /// Derive the identity from an optional package override and the proto
    /// package name.
    ///
    /// The override is parsed by a total three-way rule:
    /// - contains `;`: identifier is the part after the last `;`, path the
    ///   part before it
    /// - contains `/`: path is the whole string, identifier the part after
    ///   the last `/`
    /// - otherwise both are the whole string
    ///
    /// Without an override, both halves are the proto package with every `.`
    /// replaced by `_`. The derived identifier is not validated beyond this.
    pub fn derive(package_override: Option<&str>, proto_package: &str) -> Self {
        match package_override {
            Some(raw) => {
                if let Some(idx) = raw.rfind(';') {
                    PackageIdentity {
                        name: raw[idx + 1..].to_string(),
                        path: raw[..idx].to_string(),
                    }
                } else if let Some(idx) = raw.rfind('/') {
                    PackageIdentity {
                        name: raw[idx + 1..].to_string(),
                        path: raw.to_string(),
                    }
                } else {
                    PackageIdentity {
                        name: raw.to_string(),
                        path: raw.to_string(),
                    }
                }
            }
            None => {
                let flat = proto_package.replace('.', "_");
                PackageIdentity {
                    name: flat.clone(),
                    path: flat,
                }
            }
        }
    }
}

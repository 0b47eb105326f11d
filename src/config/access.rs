use super::*;

impl<L: EnvLookup> SigilConfig<L> {
    /// Get a typed value from the resolved active document using dot notation.
    ///
    /// Automatically handles both `snake_case` and `kebab-case` key names.
    ///
    /// # Examples
    /// ```no_run
    /// # use sigil_cfg::SigilConfig;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = SigilConfig::from_file("config.yml")?;
    /// let host: String = config.get("server.host")?;
    /// let port: u16 = config.get("server.port")?;
    /// let debug: bool = config.get("debug")?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns error if path doesn't exist or value can't be converted to type T.
    pub fn get<T>(&self, path: &str) -> Result<T, SigilError>
    where
        T: TryFrom<Value, Error = SigilError>,
    {
        let value = self.get_value_flexible(path)?;
        T::try_from(value)
    }

    /// Get an optional typed value - returns `None` if the key doesn't exist.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, SigilError>
    where
        T: TryFrom<Value, Error = SigilError>,
    {
        match self.get_value_flexible(path) {
            Ok(value) => Ok(Some(T::try_from(value)?)),
            Err(SigilError::KeyError { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a value with a fallback default.
    ///
    /// # Examples
    /// ```no_run
    /// # use sigil_cfg::SigilConfig;
    /// # let config = SigilConfig::from_file("config.yml").unwrap();
    /// let timeout = config.get_or("server.timeout", 30u64);
    /// let debug = config.get_or("debug", false);
    /// ```
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Value, Error = SigilError>,
    {
        self.get(path).unwrap_or(default)
    }

    /// Internal method that tries both snake_case and kebab-case variants.
    ///
    /// Allows flexible key access: `monitor_media` and `monitor-media` both work.
    fn get_value_flexible(&self, path: &str) -> Result<Value, SigilError> {
        // Fast path: exact
        if let Ok(v) = self.get_value(path) {
            return Ok(v);
        }

        // Root path special case handled by get_value("") already
        if path.trim().is_empty() {
            return self.get_value(path);
        }

        let segs: Vec<&str> = path.split('.').collect();

        fn variants(seg: &str) -> Vec<String> {
            let mut out = Vec::new();
            out.push(seg.to_string());

            let snake = seg.replace('-', "_");
            if snake != seg {
                out.push(snake.clone());
            }

            let kebab = seg.replace('_', "-");
            if kebab != seg {
                out.push(kebab);
            }

            // de-dupe
            out.sort();
            out.dedup();
            out
        }

        // DFS over combinations, stop on first that resolves
        fn dfs<L: EnvLookup>(
            cfg: &SigilConfig<L>,
            segs: &[&str],
            i: usize,
            cur: &mut Vec<String>,
        ) -> Result<Value, SigilError> {
            if i == segs.len() {
                let candidate = cur.join(".");
                return cfg.get_value(&candidate);
            }

            for v in variants(segs[i]) {
                cur.push(v);
                if let Ok(val) = dfs(cfg, segs, i + 1, cur) {
                    return Ok(val);
                }
                cur.pop();
            }

            Err(SigilError::KeyError {
                key: segs.join("."),
                hint: Some("Check that the path exists in your config file".into()),
                code: Some(304),
            })
        }

        dfs(self, &segs, 0, &mut Vec::new())
    }

    /// Get a raw `Value` from the resolved active document.
    ///
    /// An empty path returns the whole document.
    pub fn get_value(&self, path: &str) -> Result<Value, SigilError> {
        let root = self.config(None, false, None)?;

        if path.trim().is_empty() {
            return Ok(root);
        }

        let mut current = root;
        for segment in path.split('.') {
            current = match current {
                Value::Object(mut map) => {
                    map.shift_remove(segment).ok_or_else(|| SigilError::KeyError {
                        key: path.to_string(),
                        hint: Some("Check that the path exists in your config file".into()),
                        code: Some(304),
                    })?
                }
                other => {
                    return Err(SigilError::TypeError {
                        message: format!(
                            "Cannot descend into {:?} at segment '{}'",
                            other, segment
                        ),
                        hint: Some("Only mappings have keys".into()),
                        code: Some(306),
                    });
                }
            };
        }
        Ok(current)
    }

    /// Get all keys at a given path level.
    ///
    /// # Examples
    /// ```no_run
    /// # use sigil_cfg::SigilConfig;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = SigilConfig::from_file("config.yml")?;
    /// let keys = config.get_keys("server")?;
    /// for key in keys {
    ///     println!("server.{}", key);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_keys(&self, path: &str) -> Result<Vec<String>, SigilError> {
        let value = self.get_value(path)?;
        match value {
            Value::Object(map) => Ok(map.keys().cloned().collect()),
            _ => Err(SigilError::TypeError {
                message: format!("Path '{}' is not a mapping", path),
                hint: Some("Only mappings have keys".into()),
                code: Some(306),
            }),
        }
    }

    /// Check if a configuration path exists.
    ///
    /// # Examples
    /// ```no_run
    /// # use sigil_cfg::SigilConfig;
    /// # let config = SigilConfig::from_file("config.yml").unwrap();
    /// if config.has("server.ssl.enabled") {
    ///     println!("SSL is configured");
    /// }
    /// ```
    pub fn has(&self, path: &str) -> bool {
        self.get_value_flexible(path).is_ok()
    }
}

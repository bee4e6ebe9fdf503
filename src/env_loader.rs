use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(lifeos_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(base) = lifeos_home {
        return Some(base.join(".env"));
    }
    Some(home_dir?.join("LifeOS/.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("LIFEOS_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_lifeos_home() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/workspace/lifeos")),
            Some(PathBuf::from("/home/alice")),
        );

        let want = Some(PathBuf::from("/workspace/lifeos/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_uses_home_when_lifeos_home_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice")));
        let want = Some(PathBuf::from("/home/alice/LifeOS/.env"));
        assert_eq!(got, want);
    }
}

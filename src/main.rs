use std::path::PathBuf;

use anyhow::{bail, Context};
use version_helper::util::config::loader::CONFIG_FILE_NAME;
use version_helper::util::config::ConfigLoader;
use version_helper::util::log::log_init_with_config;
use version_helper::{build_info, find_config_file_path, CodeUnit, VersionHelper};

const USAGE: &str = "用法: version-helper [--json] [--build-info] [--config PATH] \
[--artifact PATH] [--bundle-dir DIR]... [--unit NAME]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    json: bool,
    build_info: bool,
    help: bool,
    config: Option<PathBuf>,
    artifact: Option<PathBuf>,
    bundle_dirs: Vec<PathBuf>,
    unit: Option<String>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--build-info" => parsed.build_info = true,
                "-h" | "--help" => parsed.help = true,
                "--config" => parsed.config = Some(Self::value(&mut args, &arg)?.into()),
                "--artifact" => parsed.artifact = Some(Self::value(&mut args, &arg)?.into()),
                "--bundle-dir" => parsed.bundle_dirs.push(Self::value(&mut args, &arg)?.into()),
                "--unit" => parsed.unit = Some(Self::value(&mut args, &arg)?),
                other => bail!("未知参数: {}\n{}", other, USAGE),
            }
        }

        Ok(parsed)
    }

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
        args.next()
            .with_context(|| format!("参数 {} 缺少取值\n{}", flag, USAGE))
    }

    /// 未指定制品和单元时查询本程序自身
    fn code_unit(&self) -> CodeUnit {
        match (&self.unit, &self.artifact) {
            (None, None) => VersionHelper::own_unit(),
            (unit, artifact) => {
                let name = unit.clone().unwrap_or_else(|| {
                    artifact
                        .as_ref()
                        .and_then(|path| path.file_name())
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_else(|| "artifact".to_string())
                });
                let unit = CodeUnit::new(name);
                match artifact {
                    Some(location) => unit.with_location(location.clone()),
                    None => unit,
                }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| find_config_file_path(CONFIG_FILE_NAME));
    let config = ConfigLoader::load_or_default(&config_path)
        .with_context(|| format!("配置加载失败: {}", config_path.display()))?;
    let _log_guard = log_init_with_config(&config.logging)?;

    if args.build_info {
        println!("{}", build_info::summary());
        return Ok(());
    }

    let helper = VersionHelper::from_config(&config, &args.bundle_dirs);

    let unit = args.code_unit();
    if args.json {
        let info = helper.version_info(&unit);
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", helper.version_information(&unit));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliArgs> {
        CliArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags_and_repeated_dirs() {
        let args = parse(&[
            "--json",
            "--bundle-dir",
            "conf",
            "--bundle-dir",
            "res",
            "--artifact",
            "/opt/app/core",
        ])
        .unwrap();

        assert!(args.json);
        assert_eq!(args.bundle_dirs, vec![PathBuf::from("conf"), PathBuf::from("res")]);
        assert_eq!(args.code_unit().name(), "core");
        assert_eq!(
            args.code_unit().location(),
            Some(std::path::Path::new("/opt/app/core"))
        );
    }

    #[test]
    fn defaults_to_own_unit() {
        let args = parse(&[]).unwrap();

        assert_eq!(args.code_unit(), VersionHelper::own_unit());
    }

    #[test]
    fn rejects_unknown_and_incomplete_arguments() {
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["--config"]).is_err());
    }
}

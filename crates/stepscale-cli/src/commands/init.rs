use std::path::Path;

use stepscale_policy::PolicyDeclaration;

pub fn init(path: &str, id: &str, target: &str) -> anyhow::Result<()> {
    let output = Path::new(path).join("policy.toml");
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    let declaration = PolicyDeclaration::scaffold(id, target);
    std::fs::write(&output, declaration.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

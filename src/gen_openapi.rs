use std::fs;

use recipes::api::ApiDoc;
use utoipa::OpenApi;

fn gen_my_openapi() -> anyhow::Result<String> {
    Ok(ApiDoc::openapi().to_pretty_json()?)
}

fn main() -> anyhow::Result<()> {
    let doc = gen_my_openapi()?;
    fs::write("./auto-openapi.json", doc)?;
    Ok(())
}

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use osm_wrangle::config::UserConfig;
use osm_wrangle::errors::ErrorKind;
use osm_wrangle::etl::audit_postcodes::PostcodeAuditEtl;
use osm_wrangle::etl::audit_streets::StreetAuditEtl;
use osm_wrangle::etl::sample::SampleEtl;
use osm_wrangle::etl::shape_csv::ShapeCsvEtl;
use osm_wrangle::etl::tag_census::TagCensusEtl;
use osm_wrangle::etl::Etl;
use tempfile::tempdir;

const IRVING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="osmconvert 0.8.5">
  <bounds minlat="32.8" minlon="-97.0" maxlat="32.9" maxlon="-96.9"/>
  <node id="26" lat="32.8654" lon="-96.9453" version="3" timestamp="2015-06-10T02:44:02Z" changeset="31846452" uid="147510" user="woodpeck_fixbot">
    <tag k="addr:street" v="W Pioneer Dr"/>
    <tag k="addr:postcode" v="75061"/>
    <tag k="amenity" v="café"/>
    <tag k="fixme?" v="drop me"/>
  </node>
  <node id="27" lat="32.8701" lon="-96.9410" version="1" timestamp="2015-06-10T02:44:02Z" changeset="31846452" uid="147511" user="Jérôme"/>
  <way id="900" version="2" timestamp="2016-01-01T00:00:00Z" changeset="1234" uid="147511" user="Jérôme">
    <nd ref="26"/>
    <nd ref="27"/>
    <tag k="addr:street" v="Via Rio"/>
    <tag k="addr:postcode" v="76051"/>
    <tag k="postal_code" v="7506"/>
    <nd ref="26"/>
  </way>
  <relation id="5000" version="1" timestamp="2016-01-01T00:00:00Z" changeset="1234" uid="1" user="x">
    <member type="way" ref="900" role="outer"/>
    <tag k="type" v="multipolygon"/>
  </relation>
</osm>
"#;

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("irving.osm");
    fs::write(&path, IRVING).unwrap();
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn shape_writes_five_tables() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out");
    let mut config = UserConfig::new(&input, &out);
    config.validate = true;

    let counts = ShapeCsvEtl::new(&config).process().unwrap();
    assert_eq!((counts.nodes, counts.node_tags, counts.ways, counts.way_nodes, counts.way_tags), (2, 3, 1, 3, 3));
    assert_eq!(counts.skipped_relations, 1);

    assert_eq!(read_lines(&out.join("nodes.csv")), vec![
        "id,lat,lon,user,uid,version,changeset,timestamp",
        "26,32.8654,-96.9453,woodpeck_fixbot,147510,3,31846452,2015-06-10T02:44:02Z",
        "27,32.8701,-96.9410,Jérôme,147511,1,31846452,2015-06-10T02:44:02Z",
    ]);
    assert_eq!(read_lines(&out.join("nodes_tags.csv")), vec![
        "id,key,value,type",
        "26,street,W Pioneer Drive,addr",
        "26,postcode,75061,addr",
        "26,amenity,café,regular",
    ]);
    assert_eq!(read_lines(&out.join("ways.csv")), vec![
        "id,user,uid,version,changeset,timestamp",
        "900,Jérôme,147511,2,1234,2016-01-01T00:00:00Z",
    ]);
    assert_eq!(read_lines(&out.join("ways_nodes.csv")), vec![
        "id,node_id,position",
        "900,26,0",
        "900,27,1",
        "900,26,2",
    ]);
    assert_eq!(read_lines(&out.join("ways_tags.csv")), vec![
        "id,key,value,type",
        "900,street,Via Rio,addr",
        "900,postcode,76051,addr",
        "900,postal_code,7506,regular",
    ]);

    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["way_nodes"], 3);
}

#[test]
fn shape_reads_xz_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("irving.osm.xz");
    let mut encoder = xz::write::XzEncoder::new(File::create(&input).unwrap(), 6);
    encoder.write_all(IRVING.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let config = UserConfig::new(&input, dir.path().join("out"));
    let counts = ShapeCsvEtl::new(&config).process().unwrap();
    assert_eq!(counts.nodes, 2);
    assert_eq!(counts.ways, 1);
}

#[test]
fn validation_failure_is_fatal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.osm");
    fs::write(&input, r#"<osm><node id="1" lat="x" lon="2" user="a" uid="1" version="1" changeset="1" timestamp="t"/></osm>"#).unwrap();
    let mut config = UserConfig::new(&input, dir.path().join("out"));
    config.validate = true;

    let err = ShapeCsvEtl::new(&config).process().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("lat"));
}

#[test]
fn missing_input_fails_extraction() {
    let dir = tempdir().unwrap();
    let config = UserConfig::new(dir.path().join("nope.osm"), dir.path().join("out"));
    let err = ShapeCsvEtl::new(&config).process().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Io);
    assert!(err.message.contains("nope.osm"));
}

#[test]
fn audits_write_reports() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out");
    let config = UserConfig::new(&input, &out);

    let streets = StreetAuditEtl::new(&config).process().unwrap();
    assert_eq!(streets.audit.unexpected.keys().collect::<Vec<_>>(), vec!["Dr", "Rio"]);
    assert!(streets.suggestions.iter().any(|fix| fix.original == "W Pioneer Dr" && fix.normalized == "W Pioneer Drive"));

    let postcodes = PostcodeAuditEtl::new(&config).process().unwrap();
    assert!(postcodes.malformed.contains("7506"));
    assert_eq!(postcodes.out_of_region.get("76051"), Some(&1));
    assert_eq!(postcodes.out_of_region.get("75061"), None);

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("street_audit.json")).unwrap()).unwrap();
    assert_eq!(report["unexpected"]["Rio"][0], "Via Rio");
    assert!(out.join("postcode_audit.json").exists());
}

#[test]
fn census_and_sample() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out");
    let mut config = UserConfig::new(&input, &out);
    config.sample_every = 2;

    let census = TagCensusEtl::new(&config).process().unwrap();
    assert_eq!(census.get("nd"), Some(&3));
    assert_eq!(census.get("tag"), Some(&8));
    assert_eq!(census.get("member"), Some(&1));

    let summary = SampleEtl::new(&config).process().unwrap();
    assert_eq!((summary.read, summary.written), (4, 2));
    let sample = fs::read_to_string(out.join("sample.osm")).unwrap();
    assert!(sample.contains("id=\"26\""));
    assert!(sample.contains("id=\"900\""));
    assert!(!sample.contains("id=\"27\""));
}

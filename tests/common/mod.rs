#![allow(dead_code)]

use std::io::{Cursor, Write};
use tdnet_xbrl::StaticSource;
use zip::write::SimpleFileOptions;

pub const SUMMARY: &str = "XBRLData/Summary/tse-acedjpsm-57210-20230512500000-ixbrl.htm";
pub const BALANCE_SHEET: &str =
    "XBRLData/Attachment/0101010-acbs01-tse-acedjpfr-57210-2023-03-31-01-2023-05-12-ixbrl.htm";
pub const BALANCE_SHEET_DUPLICATE: &str =
    "XBRLData/Attachment/0101000-acbs01-tse-acedjpfr-57210-2023-03-31-01-2023-05-12-ixbrl.htm";
pub const INCOME_STATEMENT: &str =
    "XBRLData/Attachment/0102010-acpl01-tse-acedjpfr-57210-2023-03-31-01-2023-05-12-ixbrl.htm";
pub const CALCULATION: &str =
    "XBRLData/Attachment/tse-acedjpfr-57210-2023-03-31-01-2023-05-12-cal.xml";
pub const PRESENTATION: &str =
    "XBRLData/Attachment/tse-acedjpfr-57210-2023-03-31-01-2023-05-12-pre.xml";
pub const LABELS: &str = "XBRLData/Attachment/tse-acedjpfr-57210-2023-03-31-01-2023-05-12-lab.xml";

/// An inline XBRL document declaring the usual contexts around `body`.
pub fn instance(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"
      xmlns:ix="http://www.xbrl.org/2013/inlineXBRL"
      xmlns:ixt="http://www.xbrl.org/inlineXBRL/transformation/2011-07-31"
      xmlns:xbrli="http://www.xbrl.org/2003/instance"
      xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
      xmlns:jppfs_cor="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2023-12-01/jppfs_cor"
      xmlns:tse-ed-t="http://www.xbrl.tdnet.info/taxonomy/jp/tse/tdnet/ed/t/2014-01-12">
<head><title>sample</title></head>
<body>
<div style="display:none"><ix:header><ix:resources>
  <xbrli:context id="CurrentYearDuration"><xbrli:entity/><xbrli:period>
    <xbrli:startDate>2022-04-01</xbrli:startDate><xbrli:endDate>2023-03-31</xbrli:endDate>
  </xbrli:period></xbrli:context>
  <xbrli:context id="CurrentYearInstant"><xbrli:entity/><xbrli:period>
    <xbrli:instant>2023-03-31</xbrli:instant>
  </xbrli:period></xbrli:context>
  <xbrli:context id="Prior1YearInstant"><xbrli:entity/><xbrli:period>
    <xbrli:instant>2022-03-31</xbrli:instant>
  </xbrli:period></xbrli:context>
</ix:resources></ix:header></div>
{}
</body>
</html>"#,
        body
    )
}

pub fn linkbase(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase"
               xmlns:xlink="http://www.w3.org/1999/xlink"
               xmlns:xml="http://www.w3.org/XML/1998/namespace">
{}
</link:linkbase>"#,
        body
    )
}

pub fn zip_archive(entries: &[(&str, String)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn summary_document() -> String {
    instance(
        r#"<p>会社名 <ix:nonNumeric name="tse-ed-t:CompanyName" contextRef="CurrentYearInstant">サンプル工業株式会社</ix:nonNumeric></p>
<p>コード <ix:nonNumeric name="tse-ed-t:SecuritiesCode" contextRef="CurrentYearInstant">57210</ix:nonNumeric></p>
<p>提出日 <ix:nonNumeric name="tse-ed-t:FilingDate" contextRef="CurrentYearInstant">2023年5月12日</ix:nonNumeric></p>
<td><ix:nonFraction name="tse-ed-t:NetSales" contextRef="CurrentYearDuration" unitRef="JPY" decimals="-6" scale="6" format="ixt:numdotdecimal">5,000</ix:nonFraction></td>
<td><ix:nonFraction name="tse-ed-t:NetSales" contextRef="Prior1YearInstant" unitRef="JPY" xsi:nil="true"/></td>"#,
    )
}

pub fn balance_sheet() -> String {
    instance(
        r#"<table>
<tr><td>流動資産合計</td><td><ix:nonFraction name="jppfs_cor:CurrentAssets" contextRef="CurrentYearInstant" unitRef="JPY" decimals="-6" scale="6" format="ixt:numdotdecimal">750</ix:nonFraction></td></tr>
<tr><td>固定資産合計</td><td><ix:nonFraction name="jppfs_cor:NoncurrentAssets" contextRef="CurrentYearInstant" unitRef="JPY" decimals="-6" scale="6" format="ixt:numdotdecimal">300</ix:nonFraction></td></tr>
<tr><td>貸倒引当金</td><td><ix:nonFraction name="jppfs_cor:AllowanceForDoubtfulAccountsCA" contextRef="CurrentYearInstant" unitRef="JPY" decimals="-6" scale="6" format="ixt:numdotdecimal">50</ix:nonFraction></td></tr>
<tr><td>資産合計</td><td><ix:nonFraction name="jppfs_cor:Assets" contextRef="CurrentYearInstant" unitRef="JPY" decimals="-6" scale="6" format="ixt:numdotdecimal">1,000</ix:nonFraction></td></tr>
</table>"#,
    )
}

/// Same logical document as [`balance_sheet`], sorting after it.
pub fn stale_balance_sheet() -> String {
    instance(
        r#"<ix:nonFraction name="jppfs_cor:Assets" contextRef="CurrentYearInstant" unitRef="JPY" decimals="-6" scale="6">9,999</ix:nonFraction>"#,
    )
}

pub fn income_statement() -> String {
    instance(
        r#"<table>
<tr><td>売上高</td><td><ix:nonFraction name="jppfs_cor:NetSales" contextRef="CurrentYearDuration" unitRef="JPY" decimals="-3" scale="3" format="ixt:numdotdecimal">5,000,000</ix:nonFraction></td></tr>
<tr><td>営業損失</td><td><ix:nonFraction name="jppfs_cor:OperatingIncome" contextRef="CurrentYearDuration" unitRef="JPY" decimals="-3" scale="3" sign="-" format="ixt:numdotdecimal">1,234</ix:nonFraction></td></tr>
<tr><td>経常利益</td><td><ix:nonFraction name="jppfs_cor:OrdinaryIncome" contextRef="Prior9YearDuration" unitRef="JPY" decimals="-3" scale="3" format="ixt:numdotdecimal">10</ix:nonFraction></td></tr>
<tr><td>特別利益</td><td><ix:nonFraction name="jppfs_cor:ExtraordinaryIncome" contextRef="CurrentYearDuration" unitRef="JPY" decimals="-3" scale="3" format="ixt:fixed-zero">－</ix:nonFraction></td></tr>
</table>"#,
    )
}

pub fn calculation_linkbase() -> String {
    linkbase(
        r#"<link:calculationLink xlink:type="extended" xlink:role="http://disclosure.edinet-fsa.go.jp/role/jppfs/rol_BalanceSheet">
  <link:loc xlink:type="locator" xlink:href="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2023-12-01/jppfs_cor_2023-12-01.xsd#jppfs_cor_Assets" xlink:label="Assets"/>
  <link:loc xlink:type="locator" xlink:href="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2023-12-01/jppfs_cor_2023-12-01.xsd#jppfs_cor_CurrentAssets" xlink:label="CurrentAssets"/>
  <link:loc xlink:type="locator" xlink:href="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2023-12-01/jppfs_cor_2023-12-01.xsd#jppfs_cor_NoncurrentAssets" xlink:label="NoncurrentAssets"/>
  <link:loc xlink:type="locator" xlink:href="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2023-12-01/jppfs_cor_2023-12-01.xsd#jppfs_cor_AllowanceForDoubtfulAccountsCA" xlink:label="Allowance"/>
  <link:calculationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="Assets" xlink:to="CurrentAssets" order="1.0" weight="1.0"/>
  <link:calculationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="Assets" xlink:to="NoncurrentAssets" order="2.0" weight="1.0"/>
  <link:calculationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="Assets" xlink:to="Allowance" order="3.0" weight="-1.0"/>
</link:calculationLink>"#,
    )
}

pub fn presentation_linkbase() -> String {
    linkbase(
        r#"<link:presentationLink xlink:type="extended" xlink:role="http://disclosure.edinet-fsa.go.jp/role/jppfs/rol_BalanceSheet">
  <link:loc xlink:type="locator" xlink:href="jppfs_cor_2023-12-01.xsd#jppfs_cor_BalanceSheetLineItems" xlink:label="LineItems"/>
  <link:loc xlink:type="locator" xlink:href="jppfs_cor_2023-12-01.xsd#jppfs_cor_Assets" xlink:label="Assets"/>
  <link:presentationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="LineItems" xlink:to="Assets" order="1.0"/>
</link:presentationLink>
<link:presentationLink xlink:type="extended" xlink:role="http://disclosure.edinet-fsa.go.jp/role/jppfs/rol_StatementOfIncome">
  <link:loc xlink:type="locator" xlink:href="jppfs_cor_2023-12-01.xsd#jppfs_cor_StatementOfIncomeLineItems" xlink:label="LineItems"/>
  <link:loc xlink:type="locator" xlink:href="jppfs_cor_2023-12-01.xsd#jppfs_cor_NetSales" xlink:label="NetSales"/>
  <link:loc xlink:type="locator" xlink:href="jppfs_cor_2023-12-01.xsd#jppfs_cor_OperatingIncome" xlink:label="OperatingIncome"/>
  <link:presentationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="LineItems" xlink:to="NetSales" order="1.0"/>
  <link:presentationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="LineItems" xlink:to="OperatingIncome" order="2.0"/>
</link:presentationLink>"#,
    )
}

pub fn local_label_linkbase() -> String {
    linkbase(
        r#"<link:labelLink xlink:type="extended" xlink:role="http://www.xbrl.org/2003/role/link">
  <link:label xlink:type="resource" xlink:label="label_jppfs_cor_NetSales_label" xlink:role="http://www.xbrl.org/2003/role/label" xml:lang="ja">売上高（当社）</link:label>
  <link:label xlink:type="resource" xlink:label="label_jppfs_cor_NetSales_label_2" xlink:role="http://www.xbrl.org/2003/role/label" xml:lang="ja">売上高（重複）</link:label>
</link:labelLink>"#,
    )
}

fn global_linkbase(labels: &[(&str, &str)]) -> String {
    let resources: String = labels
        .iter()
        .map(|(element, text)| {
            format!(
                r#"<link:label xlink:type="resource" xlink:label="label_{}" xlink:role="http://www.xbrl.org/2003/role/label" xml:lang="ja">{}</link:label>"#,
                element, text
            )
        })
        .collect();
    linkbase(&format!(
        r#"<link:labelLink xlink:type="extended" xlink:role="http://www.xbrl.org/2003/role/link">{}</link:labelLink>"#,
        resources
    ))
}

pub fn jppfs_labels() -> String {
    global_linkbase(&[
        ("NetSales", "売上高"),
        ("Assets", "資産"),
        ("CurrentAssets", "流動資産"),
        ("OperatingIncome", "営業利益"),
    ])
}

pub fn tse_labels() -> String {
    global_linkbase(&[("NetSales", "売上高"), ("CompanyName", "会社名")])
}

/// Global labels for every namespace the sample archive references.
pub fn global_labels() -> StaticSource {
    StaticSource::new()
        .with("jppfs_cor", jppfs_labels())
        .with("tse-ed-t", tse_labels())
}

pub fn sample_entries() -> Vec<(&'static str, String)> {
    vec![
        (SUMMARY, summary_document()),
        (BALANCE_SHEET, balance_sheet()),
        (BALANCE_SHEET_DUPLICATE, stale_balance_sheet()),
        (INCOME_STATEMENT, income_statement()),
        (CALCULATION, calculation_linkbase()),
        (PRESENTATION, presentation_linkbase()),
        (LABELS, local_label_linkbase()),
        ("XBRLData/Attachment/manifest.xml", "<manifest/>".to_string()),
    ]
}

pub fn sample_archive() -> Vec<u8> {
    zip_archive(&sample_entries())
}
